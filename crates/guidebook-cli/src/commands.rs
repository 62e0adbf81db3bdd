//! Subcommand handlers

use crate::Output;
use anyhow::Context as _;
use guidebook_core::{
    AccessDecision, AdminLayout, Capability, DateKeyService, GuidebookConfig, LayoutView,
    Providers, Role, StaticSession,
};
use serde_json::json;
use std::fmt::Write as _;

/// `guidebook roles`
pub fn roles(output: Output) -> anyhow::Result<String> {
    match output {
        Output::Json => {
            let rows: Vec<_> = Role::ALL
                .iter()
                .map(|role| {
                    json!({
                        "id": role,
                        "label": role.display_name(),
                        "capabilities": role.capabilities(),
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&rows)?)
        }
        Output::Text => {
            let mut out = String::new();
            for role in Role::ALL {
                let caps: Vec<&str> = role.capabilities().iter().map(|c| c.as_str()).collect();
                writeln!(
                    out,
                    "{:<16} {:<16} {}",
                    role.as_str(),
                    role.display_name(),
                    caps.join(", ")
                )?;
            }
            Ok(out.trim_end().to_string())
        }
    }
}

/// `guidebook today`
pub fn today(dates: &DateKeyService, output: Output) -> anyhow::Result<String> {
    let key = dates.daily_key();
    match output {
        Output::Json => Ok(serde_json::to_string_pretty(&json!({ "today": key }))?),
        Output::Text => Ok(key),
    }
}

/// `guidebook key`
pub fn key(
    dates: &DateKeyService,
    branch: &str,
    role: &str,
    date: Option<&str>,
    strict: bool,
    output: Output,
) -> anyhow::Result<String> {
    let key = if strict {
        dates.try_checklist_storage_key(branch, role, date)?
    } else {
        dates.checklist_storage_key(branch, role, date)
    };
    match output {
        Output::Json => Ok(serde_json::to_string_pretty(&json!({ "key": key }))?),
        Output::Text => Ok(key),
    }
}

/// `guidebook format`
pub fn format(
    dates: &DateKeyService,
    input: &str,
    pattern: Option<&str>,
    time: bool,
    output: Output,
) -> anyhow::Result<String> {
    let formatted = if time {
        dates.format_time(input)?
    } else {
        dates.format_date(input, pattern)?
    };
    match output {
        Output::Json => Ok(serde_json::to_string_pretty(&json!({ "formatted": formatted }))?),
        Output::Text => Ok(formatted),
    }
}

/// `guidebook access`
pub fn access(
    config: &GuidebookConfig,
    role: &str,
    capability: &str,
    preview_as: Option<&str>,
    output: Output,
) -> anyhow::Result<String> {
    let real_role = match role {
        "none" => None,
        other => Some(other.parse::<Role>().context("--role")?),
    };
    let required: Capability = capability.parse().context("--capability")?;

    let ctx = Providers::new(config.clone())?.mount(StaticSession::from_role(real_role));
    if let Some(target) = preview_as {
        let target: Role = target.parse().context("--preview-as")?;
        ctx.request_preview(target).context("--preview-as")?;
    }

    let decision = ctx.can_access(required);
    let view = AdminLayout::new(required).render(&ctx);

    match output {
        Output::Json => Ok(serde_json::to_string_pretty(&json!({
            "real_role": real_role,
            "preview": ctx.preview().state(),
            "capability": required,
            "decision": decision,
            "view": view,
        }))?),
        Output::Text => {
            let mut out = String::new();
            match decision {
                AccessDecision::Granted => writeln!(out, "granted")?,
                AccessDecision::Denied(reason) => writeln!(out, "denied ({reason:?})")?,
            }
            match view {
                LayoutView::Page(page) => {
                    write!(out, "renders as {}", page.effective_role.display_name())?;
                    if let Some(banner) = page.banner {
                        write!(out, " [{}]", banner.message)?;
                    }
                }
                LayoutView::Redirect { to, .. } => write!(out, "redirect to {to}")?,
            }
            Ok(out)
        }
    }
}
