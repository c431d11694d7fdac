use serde::Serialize;
use serde_json::Value;

use crate::{
    domain::Entity,
    formatting::{format_user, FormattedUser},
    port::TelegramPort,
    resolve::resolve_chat_ref,
    utils::{best_effort, opt_limit, require, require_str, to_pretty_json},
    Result,
};

#[derive(Debug, Serialize)]
struct ContactsOutput<'a> {
    query: &'a str,
    result_count: usize,
    contacts: Vec<FormattedUser>,
}

pub async fn search_contacts(port: &dyn TelegramPort, args: &Value) -> Result<String> {
    let query = require_str(args, "query")?;
    let limit = opt_limit(args, "limit", 10)?;

    let contacts = port
        .search_contacts(query, limit)
        .await?
        .iter()
        .take(limit)
        .map(format_user)
        .collect::<Vec<_>>();

    to_pretty_json(&ContactsOutput {
        query,
        result_count: contacts.len(),
        contacts,
    })
}

#[derive(Debug, Serialize)]
struct UserInfoOutput {
    #[serde(flatten)]
    user: FormattedUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    bio: Option<Option<String>>,
}

pub async fn get_user_info(port: &dyn TelegramPort, args: &Value) -> Result<String> {
    let raw = require(args, "user_id")?;
    let entity = port.get_entity(&resolve_chat_ref("user_id", raw)?).await?;

    let Entity::User(user) = &entity else {
        let shown = match raw {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Ok(format!(
            "Entity {shown} is not a user (it's a {}).",
            entity.kind_name()
        ));
    };

    let bio = best_effort("user bio", port.user_bio(user)).await;

    to_pretty_json(&UserInfoOutput {
        user: format_user(user),
        bio,
    })
}
