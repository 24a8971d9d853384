use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use tracing::warn;

use bookdesk_core::{AuthSession, Config, GuardDecision, RouteGuard};

/// Username used when none is given on the command line or in config
const ENV_USERNAME: &str = "BOOKDESK_USERNAME";

/// Password used instead of prompting (for scripted logins)
const ENV_PASSWORD: &str = "BOOKDESK_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { username: Option<String> },
    Logout,
    WhoAmI,
    Status,
    Visit { path: String },
}

impl Command {
    pub fn parse(args: &[String]) -> Option<Self> {
        let (name, rest) = args.split_first()?;
        match (name.as_str(), rest) {
            ("login", []) => Some(Command::Login { username: None }),
            ("login", [username]) => Some(Command::Login {
                username: Some(username.clone()),
            }),
            ("logout", []) => Some(Command::Logout),
            ("whoami", []) => Some(Command::WhoAmI),
            ("status", []) => Some(Command::Status),
            ("visit", [path]) => Some(Command::Visit {
                path: normalize_path(path),
            }),
            _ => None,
        }
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

pub async fn run(command: Command, session: &AuthSession, guard: &RouteGuard, config: Config) -> Result<ExitCode> {
    match command {
        Command::Login { username } => login(session, config, username).await,
        Command::Logout => {
            session.logout().await;
            println!("Signed out.");
            Ok(ExitCode::SUCCESS)
        }
        Command::WhoAmI => {
            match session.session().user {
                Some(user) if session.is_authenticated() => {
                    println!("{} ({}), enrollment {}", user.name, user.role, user.enrollment.unwrap_or_default());
                }
                _ => println!("Not signed in."),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            let current = session.session();
            if !current.is_authenticated() {
                println!("Anonymous");
                return Ok(ExitCode::SUCCESS);
            }
            if let Some(user) = &current.user {
                println!("Signed in as {} ({})", user.name, user.role);
                if let Some(subject) = current.credential.as_ref().and_then(|c| c.subject()) {
                    println!("Credential subject: {}", subject);
                }
                println!("Home: {}", guard.routes().home_for(user.role));
            }
            match current.minutes_until_expiry() {
                Some(minutes) => println!("Credential expires in {} minutes", minutes),
                None => println!("Credential does not expire"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Visit { path } => {
            match guard.visit(&path) {
                GuardDecision::Render => println!("Rendering {}", path),
                GuardDecision::Loading => println!("Loading..."),
                GuardDecision::RedirectToLogin => {
                    println!("Not signed in, redirected to {}", guard.current_path())
                }
                GuardDecision::AccessDenied(_) => {
                    println!("Redirected to {}", guard.current_path())
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn login(session: &AuthSession, config: Config, username: Option<String>) -> Result<ExitCode> {
    let username = match username
        .or_else(|| std::env::var(ENV_USERNAME).ok())
        .or_else(|| config.last_username.clone())
    {
        Some(username) => username,
        None => prompt_username()?,
    };

    let password = match std::env::var(ENV_PASSWORD) {
        Ok(password) => password,
        Err(_) => rpassword::prompt_password(format!("Password for {}: ", username))?,
    };

    if username.is_empty() || password.is_empty() {
        return Err(anyhow::anyhow!("Username and password required"));
    }

    Ok(submit_login(session, config, username, &password).await)
}

/// Log in and report the outcome once, inline.
async fn submit_login(session: &AuthSession, mut config: Config, username: String, password: &str) -> ExitCode {
    match session.login(&username, password).await {
        Ok(user) => {
            config.last_username = Some(username);
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }
            println!("Welcome, {} ({})", user.name, user.role);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn prompt_username() -> Result<String> {
    print!("Username: ");
    io::stdout().flush()?;

    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    Ok(username.trim().to_string())
}
