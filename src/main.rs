//! Maison Manoé CLI - manage a shop API session from the terminal.
//!
//! Wraps the client session library with login/logout/register/whoami/status
//! commands. The durable storage scope is a JSON file under the config
//! directory, or the OS keychain when enabled with `--keyring`.

use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use manoe_client::{
    update_auth_ui, ApiClient, ApiError, AuthUi, Config, FileStorage, KeyValueStorage,
    KeyringStorage, MemoryStorage, NavigationIntent, Navigator, RegisterRequest, SessionStore,
};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("Maison Manoé client starting");

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("login") => cmd_login(&args[2..]).await,
        Some("logout") => cmd_logout(),
        Some("register") => cmd_register().await,
        Some("whoami") => cmd_whoami().await,
        Some("status") => cmd_status(),
        _ => {
            usage();
            Ok(())
        }
    }
}

fn usage() {
    eprintln!("Maison Manoé client");
    eprintln!();
    eprintln!("Usage: manoe <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login [--remember] [--keyring]  Sign in (--remember keeps the session)");
    eprintln!("  logout                          Sign out and clear the stored session");
    eprintln!("  register                        Create an account");
    eprintln!("  whoami                          Show the signed-in profile from the API");
    eprintln!("  status                          Show the local session state");
}

/// Terminal stand-in for page navigation: there is no page to redirect, so
/// intents are only logged.
struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&self, intent: &NavigationIntent) {
        info!(url = %intent.url, "Navigation requested");
    }
}

fn build_session(config: &Config) -> Result<SessionStore> {
    let durable: Box<dyn KeyValueStorage> = if config.use_keyring {
        Box::new(KeyringStorage::new())
    } else {
        Box::new(FileStorage::new(Config::session_dir()?))
    };
    Ok(SessionStore::new(durable, Box::new(MemoryStorage::new())))
}

fn build_client(config: &Config) -> Result<ApiClient> {
    ApiClient::new(
        config.api_base_url(),
        build_session(config)?,
        Arc::new(CliNavigator),
    )
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_with_default(label: &str, default: Option<&str>) -> Result<String> {
    let Some(default) = default else {
        return prompt(label);
    };
    print!("{} [{}]: ", label, default);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();
    Ok(if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    })
}

async fn cmd_login(flags: &[String]) -> Result<()> {
    let mut config = Config::load()?;
    let remember = flags.iter().any(|f| f == "--remember");
    if flags.iter().any(|f| f == "--keyring") {
        config.use_keyring = true;
    }

    let email = prompt_with_default("Email", config.last_email.as_deref())?;
    let password = rpassword::prompt_password("Password: ")?;

    let client = build_client(&config)?;
    let outcome = client.login(&email, &password, remember).await?;

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    match &outcome.user {
        Some(user) => println!("Signed in as {} <{}>", user.full_name(), user.email),
        None => println!("Signed in (profile unavailable)"),
    }
    if !remember {
        println!("Session ends with this process; pass --remember to stay signed in.");
    }
    Ok(())
}

fn cmd_logout() -> Result<()> {
    let config = Config::load()?;
    let client = build_client(&config)?;
    client.logout(None)?;
    println!("Signed out.");
    Ok(())
}

async fn cmd_register() -> Result<()> {
    let config = Config::load()?;

    let email = prompt("Email")?;
    let first_name = prompt("First name")?;
    let last_name = prompt("Last name")?;
    let phone = prompt("Phone (optional)")?;
    let password = rpassword::prompt_password("Password (min 8 chars): ")?;

    let request = RegisterRequest {
        email,
        password,
        first_name,
        last_name,
        phone: Some(phone).filter(|p| !p.is_empty()),
    };

    let client = build_client(&config)?;
    let created = client.register(&request).await?;
    println!(
        "Account created for {} <{}>. Run `manoe login` to sign in.",
        created.full_name(),
        created.email
    );
    Ok(())
}

async fn cmd_whoami() -> Result<()> {
    let config = Config::load()?;
    let client = build_client(&config)?;

    match client.fetch_user_profile().await {
        Ok(user) => {
            println!("{} <{}>", user.full_name(), user.email);
            if let Some(phone) = &user.phone {
                println!("Phone: {}", phone);
            }
            if user.is_admin {
                println!("Role: admin");
            }
            Ok(())
        }
        Err(e) => match e.downcast_ref::<ApiError>() {
            Some(ApiError::NotAuthenticated) => {
                println!("Not signed in. Run `manoe login` first.");
                Ok(())
            }
            Some(ApiError::SessionExpired) => {
                println!("Session expired. Run `manoe login` to sign in again.");
                Ok(())
            }
            _ => Err(e),
        },
    }
}

/// Renders the auth state the way a page header would: an account section
/// for signed-in users, a sign-in prompt for guests.
#[derive(Default)]
struct StatusScreen {
    authenticated: Cell<bool>,
    name: RefCell<Option<String>>,
    email: RefCell<Option<String>>,
    first_name: RefCell<Option<String>>,
}

impl AuthUi for StatusScreen {
    fn show_authenticated(&self, visible: bool) {
        self.authenticated.set(visible);
    }

    fn show_guest(&self, _visible: bool) {
        // Inverse of the authenticated section; render() derives it
    }

    fn set_user_name(&self, name: &str) {
        *self.name.borrow_mut() = Some(name.to_string());
    }

    fn set_user_email(&self, email: &str) {
        *self.email.borrow_mut() = Some(email.to_string());
    }

    fn set_user_first_name(&self, first_name: &str) {
        *self.first_name.borrow_mut() = Some(first_name.to_string());
    }
}

impl StatusScreen {
    fn render(&self) {
        if !self.authenticated.get() {
            println!("Not signed in. Run `manoe login` to sign in.");
            return;
        }
        if let Some(first) = self.first_name.borrow().as_deref() {
            println!("Bonjour {} !", first);
        }
        match (self.name.borrow().as_deref(), self.email.borrow().as_deref()) {
            (Some(name), Some(email)) => println!("Signed in as {} <{}>", name, email),
            _ => println!("Signed in (no cached profile)"),
        }
    }
}

fn cmd_status() -> Result<()> {
    let config = Config::load()?;
    let session = build_session(&config)?;

    let screen = StatusScreen::default();
    update_auth_ui(&session, &screen);
    screen.render();
    Ok(())
}
