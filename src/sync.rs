//! Slash-command registration sync.
//!
//! Translates the loaded command descriptors into Discord's registration
//! format (localized descriptions from the locale tables, truncation to the
//! API limit, recursive sub-options) and PUTs the full set to the global or
//! per-guild route. Deploying is a full-set replacement, so re-issuing the
//! same deploy converges to the same remote state.

use crate::error::Result;
use crate::i18n::I18n;
use crate::registry::{CommandDescriptor, CommandOptionDescriptor};
use poise::serenity_prelude as serenity;
use serenity::{CreateCommand, CreateCommandOption};
use tracing::{error, info};

/// Discord's description length limit.
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// Where to register the command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncScope {
    /// Every guild the bot serves
    Global,
    /// One designated guild
    Guild(serenity::GuildId),
}

impl SyncScope {
    fn describe(&self) -> String {
        match self {
            SyncScope::Global => "globally".to_string(),
            SyncScope::Guild(id) => format!("in guild {}", id),
        }
    }
}

/// Push the full set, or clear it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Deploy,
    Undeploy,
}

/// Register (or clear) the slash-command set at the given scope.
///
/// Returns the number of commands pushed. Remote failures are logged with
/// their scope and mode, then returned to the caller.
pub async fn sync_commands(
    http: impl AsRef<serenity::Http>,
    i18n: &I18n,
    descriptors: &[CommandDescriptor],
    scope: SyncScope,
    mode: SyncMode,
) -> Result<usize> {
    let body = match mode {
        SyncMode::Deploy => build_command_bodies(descriptors, i18n),
        SyncMode::Undeploy => Vec::new(),
    };
    let count = body.len();

    let outcome = match scope {
        SyncScope::Global => serenity::Command::set_global_commands(http, body)
            .await
            .map(|_| ()),
        SyncScope::Guild(guild_id) => guild_id.set_commands(http, body).await.map(|_| ()),
    };

    match outcome {
        Ok(()) => {
            let action = match mode {
                SyncMode::Deploy => "deployed",
                SyncMode::Undeploy => "removed",
            };
            info!(
                "successfully {} {} slash commands {}",
                action,
                count,
                scope.describe()
            );
            Ok(count)
        }
        Err(e) => {
            error!(
                "failed to {} commands {}: {}",
                match mode {
                    SyncMode::Deploy => "deploy",
                    SyncMode::Undeploy => "undeploy",
                },
                scope.describe(),
                e
            );
            Err(e.into())
        }
    }
}

/// Build registration bodies for every slash-eligible descriptor.
pub fn build_command_bodies(
    descriptors: &[CommandDescriptor],
    i18n: &I18n,
) -> Vec<CreateCommand> {
    descriptors
        .iter()
        .filter(|d| d.slash)
        .map(|d| build_command(d, i18n))
        .collect()
}

fn build_command(descriptor: &CommandDescriptor, i18n: &I18n) -> CreateCommand {
    let description = truncate(&i18n.translate(&descriptor.description_key, None));
    let mut command = CreateCommand::new(&descriptor.name).description(description);

    for (locale, text) in i18n.localizations(&descriptor.description_key) {
        command = command.description_localized(locale, truncate(&text));
    }

    if !descriptor.user_permissions.is_empty() {
        command = command.default_member_permissions(descriptor.user_permissions);
    }

    for option in &descriptor.options {
        command = command.add_option(build_option(option, i18n));
    }

    command
}

fn build_option(option: &CommandOptionDescriptor, i18n: &I18n) -> CreateCommandOption {
    let description = truncate(&i18n.translate(&option.description_key, None));
    let mut builder = CreateCommandOption::new(option.kind, &option.name, description);

    for (locale, text) in i18n.localizations(&option.description_key) {
        builder = builder.description_localized(locale, truncate(&text));
    }

    let is_subcommand = matches!(
        option.kind,
        serenity::CommandOptionType::SubCommand | serenity::CommandOptionType::SubCommandGroup
    );
    if option.required && !is_subcommand {
        builder = builder.required(true);
    }

    for sub in &option.options {
        builder = builder.add_sub_option(build_option(sub, i18n));
    }

    builder
}

/// Clamp a description to the API limit.
fn truncate(text: &str) -> String {
    text.chars().take(MAX_DESCRIPTION_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise::serenity_prelude::Permissions;

    fn fixture_i18n() -> I18n {
        let long_tail = "x".repeat(150);
        let en = format!(
            r#"{{
                "cmd": {{
                    "short": {{ "description": "A short description" }},
                    "long": {{ "description": "{}" }},
                    "parent": {{
                        "description": "Parent command",
                        "sub": {{ "description": "A nested subcommand that is localized" }}
                    }},
                    "opt": {{ "description": "An option" }}
                }}
            }}"#,
            long_tail
        );
        let es = r#"{
            "cmd": {
                "short": { "description": "Una descripción corta" },
                "parent": {
                    "sub": { "description": "Un subcomando anidado" }
                }
            }
        }"#;
        I18n::from_sources(&[("en", en.as_str()), ("es-ES", es)]).unwrap()
    }

    fn descriptor(name: &str, key: &str) -> CommandDescriptor {
        CommandDescriptor {
            name: name.to_string(),
            aliases: Vec::new(),
            category: "test".to_string(),
            description_key: key.to_string(),
            user_permissions: Permissions::empty(),
            slash: true,
            options: Vec::new(),
        }
    }

    fn body_json(descriptors: &[CommandDescriptor], i18n: &I18n) -> serde_json::Value {
        serde_json::to_value(build_command_bodies(descriptors, i18n)).unwrap()
    }

    #[test]
    fn test_description_truncated_to_limit() {
        let i18n = fixture_i18n();
        let body = body_json(&[descriptor("long", "cmd.long.description")], &i18n);

        let description = body[0]["description"].as_str().unwrap();
        assert_eq!(description.chars().count(), MAX_DESCRIPTION_LEN);
    }

    #[test]
    fn test_short_description_untouched() {
        let i18n = fixture_i18n();
        let body = body_json(&[descriptor("short", "cmd.short.description")], &i18n);

        assert_eq!(
            body[0]["description"].as_str().unwrap(),
            "A short description"
        );
    }

    #[test]
    fn test_localizations_resolved_with_silent_fallback() {
        let i18n = fixture_i18n();
        let with_locale = body_json(&[descriptor("short", "cmd.short.description")], &i18n);
        assert_eq!(
            with_locale[0]["description_localizations"]["es-ES"]
                .as_str()
                .unwrap(),
            "Una descripción corta"
        );

        // No es-ES entry for this key: the locale is simply omitted
        let without_locale = body_json(&[descriptor("long", "cmd.long.description")], &i18n);
        let localizations = &without_locale[0]["description_localizations"];
        assert!(localizations.is_null() || localizations.get("es-ES").is_none());
    }

    #[test]
    fn test_sub_options_translated_recursively() {
        let i18n = fixture_i18n();
        let mut parent = descriptor("parent", "cmd.parent.description");
        parent.options = vec![CommandOptionDescriptor {
            kind: serenity::CommandOptionType::SubCommand,
            name: "sub".to_string(),
            description_key: "cmd.parent.sub.description".to_string(),
            required: false,
            options: vec![CommandOptionDescriptor {
                kind: serenity::CommandOptionType::String,
                name: "value".to_string(),
                description_key: "cmd.opt.description".to_string(),
                required: true,
                options: Vec::new(),
            }],
        }];

        let body = body_json(&[parent], &i18n);
        let sub = &body[0]["options"][0];
        assert_eq!(
            sub["description"].as_str().unwrap(),
            "A nested subcommand that is localized"
        );
        assert_eq!(
            sub["description_localizations"]["es-ES"].as_str().unwrap(),
            "Un subcomando anidado"
        );
        assert_eq!(sub["options"][0]["required"], serde_json::json!(true));
    }

    #[test]
    fn test_deploy_body_is_deterministic() {
        let i18n = fixture_i18n();
        let descriptors = vec![
            descriptor("short", "cmd.short.description"),
            descriptor("long", "cmd.long.description"),
        ];

        assert_eq!(body_json(&descriptors, &i18n), body_json(&descriptors, &i18n));
    }

    #[test]
    fn test_non_slash_commands_excluded() {
        let i18n = fixture_i18n();
        let mut hidden = descriptor("short", "cmd.short.description");
        hidden.slash = false;

        assert!(build_command_bodies(&[hidden], &i18n).is_empty());
    }

    #[test]
    fn test_permissions_serialized_when_declared() {
        let i18n = fixture_i18n();
        let mut privileged = descriptor("short", "cmd.short.description");
        privileged.user_permissions = Permissions::MANAGE_GUILD;

        let body = body_json(&[privileged], &i18n);
        let serialized = match &body[0]["default_member_permissions"] {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        assert_eq!(serialized, Permissions::MANAGE_GUILD.bits().to_string());
    }
}
