//! Guard command - evaluate a route guard against the current session

use anyhow::Result;
use colored::Colorize;
use fishtail_core::domain::{can_access_route, select_layout, Role, RouteGuard, RouteKind};
use fishtail_core::GuardState;

use super::{get_context, log_command, spinner};
use crate::output;

pub struct GuardArgs {
    pub route: String,
    pub roles: Vec<String>,
    pub public: bool,
    pub url: Option<String>,
    pub json: bool,
}

fn build_guard(args: &GuardArgs) -> Result<RouteGuard> {
    if args.public {
        return Ok(RouteGuard::public());
    }
    let roles = args
        .roles
        .iter()
        .filter(|r| !r.trim().is_empty())
        .map(|r| Role::parse(r).ok_or_else(|| anyhow::anyhow!("Unknown role '{}'", r)))
        .collect::<Result<Vec<_>>>()?;
    Ok(RouteGuard::new(roles))
}

fn route_kind(guard: &RouteGuard) -> RouteKind {
    if guard.require_auth {
        RouteKind::Protected
    } else {
        RouteKind::Public
    }
}

pub fn run(args: GuardArgs) -> Result<()> {
    let guard = build_guard(&args)?;
    let (ctx, navigator) = get_context(args.url.as_deref(), args.json)?;
    log_command(&ctx.logger, "guard");

    let bar = spinner("Checking session...", args.json);
    let session = ctx.initialize_session();
    bar.finish_and_clear();

    let outcome = ctx.auth_service.guard(&guard, &args.route);
    let layout = select_layout(route_kind(&guard), &session);
    let in_navigation = session.role().map(|role| can_access_route(&args.route, role));

    if args.json {
        return output::json(&serde_json::json!({
            "route": args.route,
            "guard": guard,
            "outcome": outcome,
            "layout": layout,
            "inNavigation": in_navigation,
            "redirect": navigator.visited().last(),
        }));
    }

    match &outcome {
        GuardState::Loading if session.is_loading => output::info("Session is still loading"),
        GuardState::Loading => output::info(&format!(
            "No session: {} stays on the loading screen until someone signs in",
            args.route
        )),
        GuardState::Authorized => output::success(&format!("{} is authorized", args.route)),
        GuardState::Redirecting => output::warning("No session: redirecting to sign-in"),
        GuardState::RoleRejected { redirect_to } => output::warning(&format!(
            "Role not allowed here: sending to {}",
            redirect_to
        )),
    }

    println!("  Layout: {}", layout.as_str());
    match in_navigation {
        Some(true) => println!("  Listed in this role's navigation"),
        Some(false) => println!("  {}", "Not listed in this role's navigation".dimmed()),
        None => {}
    }
    Ok(())
}
