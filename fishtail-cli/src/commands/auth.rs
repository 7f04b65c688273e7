//! Auth commands - backend sign-in pages and logout

use std::collections::HashMap;

use anyhow::Result;
use dialoguer::Confirm;
use fishtail_core::{Error, OperationResult};

use super::{get_context, log_command};
use crate::output;

/// Backend auth page to open
#[derive(Debug, Clone, Copy)]
pub enum AuthPage {
    Login,
    Register,
    ForgotPassword,
}

pub fn open(page: AuthPage, json: bool) -> Result<()> {
    let (ctx, navigator) = get_context(None, json)?;

    match page {
        AuthPage::Login => ctx.auth_service.login(),
        AuthPage::Register => ctx.auth_service.register(),
        AuthPage::ForgotPassword => ctx.auth_service.forgot_password(),
    }

    if json {
        output::json(&serde_json::json!({ "redirect": navigator.visited().last() }))?;
    }
    Ok(())
}

pub fn verify_email(token: &str, json: bool) -> Result<()> {
    if token.trim().is_empty() {
        anyhow::bail!("Verification token cannot be empty");
    }
    let (ctx, navigator) = get_context(None, json)?;
    ctx.auth_service.verify_email(token.trim());

    if json {
        output::json(&serde_json::json!({ "redirect": navigator.visited().last() }))?;
    }
    Ok(())
}

pub fn logout(force: bool, json: bool) -> Result<()> {
    let (ctx, navigator) = get_context(None, json)?;

    if !force && !json {
        let who = ctx
            .auth_service
            .stored_user()
            .map(|u| format!(" {}", u.email))
            .unwrap_or_default();
        if !Confirm::new()
            .with_prompt(format!("Sign out{}?", who))
            .default(true)
            .interact()?
        {
            println!("Cancelled.");
            return Ok(());
        }
    }

    log_command(&ctx.logger, "logout");
    let outcome = ctx.auth_service.logout();

    if json {
        let mut result: OperationResult<()> = outcome.map_err(Error::from).into();
        let mut context = HashMap::new();
        context.insert("redirect".to_string(), serde_json::json!(navigator.visited().last()));
        result.context = Some(context);
        return output::json(&result);
    }

    if let Err(e) = outcome {
        output::warning(&format!("Backend logout failed ({}); local session cleared anyway", e));
    }
    output::success("Signed out");
    Ok(())
}
