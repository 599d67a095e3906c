//! Account commands - signup, login, logout, whoami, profile

use std::env;

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::{Input, Password};
use motoshop_core::services::AuthService;
use motoshop_core::{LogEvent, OperationResult, ProfileUpdate, User};

use super::{get_context, get_logger, log_event, log_failure};
use crate::output::{create_table, format_price, info, print_json, success, warning};

/// Environment variable holding the password for non-interactive use
const PASSWORD_ENV: &str = "MOTOSHOP_PASSWORD";

fn interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Get password from --password flag, MOTOSHOP_PASSWORD env var, or prompt
fn get_password_or_prompt(password_flag: Option<String>) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }
    if let Ok(p) = env::var(PASSWORD_ENV) {
        return Ok(p);
    }
    if !interactive() {
        bail!("No password given. Use --password or set {}", PASSWORD_ENV);
    }
    Ok(Password::new().with_prompt("Password").interact()?)
}

/// Same as `get_password_or_prompt`, asking twice when prompting
fn get_password_with_confirm(password_flag: Option<String>) -> Result<String> {
    if password_flag.is_some() || env::var(PASSWORD_ENV).is_ok() {
        return get_password_or_prompt(password_flag);
    }
    if !interactive() {
        bail!("No password given. Use --password or set {}", PASSWORD_ENV);
    }

    let password = Password::new().with_prompt("Choose a password").interact()?;
    let confirmation = Password::new().with_prompt("Confirm password").interact()?;
    AuthService::confirm_password(&password, &confirmation)?;
    Ok(password)
}

fn get_field_or_prompt(value: Option<String>, prompt: &str, flag: &str) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    if !interactive() {
        bail!("Missing {}", flag);
    }
    Ok(Input::<String>::new().with_prompt(prompt).interact_text()?)
}

fn print_user(user: &User) {
    println!("  Name:  {}", user.name.bold());
    println!("  Email: {}", user.email);
    if let Some(avatar) = &user.avatar {
        println!("  Avatar: {}", avatar.dimmed());
    }
}

pub fn run_signup(
    email: Option<String>,
    name: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    let email = get_field_or_prompt(email, "Email", "--email")?;
    let name = get_field_or_prompt(name, "Name", "--name")?;
    let password = get_password_with_confirm(password)?;

    let user = match ctx.auth_service.signup(&email, &password, &name) {
        Ok(user) => user,
        Err(e) => {
            log_failure(&logger, "signup_failed", "signup", &e);
            return Err(e.into());
        }
    };
    log_event(&logger, LogEvent::new("signup_completed").with_command("signup"));

    if json {
        return print_json(&OperationResult::ok(user));
    }
    success(&format!("Welcome, {}! Your account is ready and you are logged in.", user.name));
    Ok(())
}

pub fn run_login(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    let email = get_field_or_prompt(email, "Email", "--email")?;
    let password = get_password_or_prompt(password)?;

    let user = match ctx.auth_service.login(&email, &password) {
        Ok(user) => user,
        Err(e) => {
            log_failure(&logger, "login_failed", "login", &e);
            return Err(e.into());
        }
    };
    log_event(&logger, LogEvent::new("login_completed").with_command("login"));

    if json {
        return print_json(&OperationResult::ok(user));
    }
    success(&format!("Logged in as {}", user.name));
    Ok(())
}

pub fn run_logout(json: bool) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    let was_logged_in = ctx.auth_service.is_logged_in();
    ctx.auth_service.logout()?;
    log_event(&logger, LogEvent::new("logout").with_command("logout"));

    if json {
        return print_json(&OperationResult::ok(was_logged_in));
    }
    if was_logged_in {
        success("Logged out");
    } else {
        info("You were not logged in");
    }
    Ok(())
}

pub fn run_whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.auth_service.current_user().cloned();

    if json {
        return print_json(&OperationResult::ok(user));
    }
    match user {
        Some(user) => print_user(&user),
        None => info("Not logged in"),
    }
    Ok(())
}

pub fn run_profile(
    name: Option<String>,
    email: Option<String>,
    avatar: Option<String>,
    json: bool,
) -> Result<()> {
    let logger = get_logger();
    let mut ctx = get_context()?;

    let update = ProfileUpdate { name, email, avatar };
    let user = if update.is_empty() {
        ctx.auth_service.current_user().cloned()
    } else {
        match ctx.auth_service.update_profile(&update) {
            Ok(user) => {
                if user.is_some() {
                    log_event(&logger, LogEvent::new("profile_updated").with_command("profile"));
                }
                user
            }
            Err(e) => {
                log_failure(&logger, "profile_update_failed", "profile", &e);
                return Err(e.into());
            }
        }
    };

    let Some(user) = user else {
        if json {
            return print_json(&OperationResult::<User>::fail(
                motoshop_core::Error::NoActiveSession.to_string(),
            ));
        }
        warning("Not logged in. Run `moto login` first.");
        return Ok(());
    };

    let orders = ctx.order_service.orders_for(&user);
    let stats = ctx.order_service.stats_for(&user);

    if json {
        return print_json(
            &OperationResult::ok(user).with_context("stats", serde_json::to_value(&stats)?),
        );
    }

    if !update.is_empty() {
        success("Profile updated");
    }
    print_user(&user);
    println!();

    let mut table = create_table();
    table.add_row(vec!["Orders".to_string(), stats.order_count.to_string()]);
    table.add_row(vec!["Total spent".to_string(), format_price(stats.total_spent)]);
    if let Some(latest) = orders.first() {
        table.add_row(vec![
            "Latest order".to_string(),
            format!("{} ({})", latest.display_id(), latest.created_at.format("%Y-%m-%d")),
        ]);
    }
    println!("{}", table);
    Ok(())
}
