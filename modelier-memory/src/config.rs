use modelier_core::{Context, Error, Result, truncate_long};
use std::{
    fmt::{self, Display},
    str::FromStr,
};
use url::Url;

pub const MEMORY_SCHEME: &str = "memory";

/// How the connection assigns the `id` of inserted rows that do not carry one.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// Per table counter starting at 1.
    #[default]
    Sequence,
    /// Random v4 uuid, text primary keys only.
    Uuid,
}

impl FromStr for IdStrategy {
    type Err = Error;
    fn from_str(value: &str) -> Result<Self> {
        match value {
            "sequence" => Ok(IdStrategy::Sequence),
            "uuid" => Ok(IdStrategy::Uuid),
            _ => Err(Error::msg(format!(
                "Unknown id strategy `{}`, expected `sequence` or `uuid`",
                truncate_long(value)
            ))),
        }
    }
}

impl Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdStrategy::Sequence => "sequence",
            IdStrategy::Uuid => "uuid",
        })
    }
}

/// Settings of a [`crate::MemoryConnection`], read from `memory://[name]?ids=sequence|uuid`.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Label used in logs, the host part of the url.
    pub name: String,
    pub ids: IdStrategy,
}

impl MemoryConfig {
    pub fn from_url(url: &str) -> Result<Self> {
        let context = || format!("While parsing the memory url `{}`", truncate_long(url));
        let prefix = format!("{}://", MEMORY_SCHEME);
        if !url.starts_with(&prefix) {
            let error = Error::msg(format!(
                "Memory connection url must start with `{}`",
                &prefix
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let parsed = Url::parse(url).with_context(context)?;
        let mut config = MemoryConfig {
            name: parsed.host_str().unwrap_or_default().to_string(),
            ..Default::default()
        };
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "ids" => config.ids = value.parse().with_context(context)?,
                _ => {
                    let error = Error::msg(format!("Unknown parameter `{}`", key))
                        .context(context());
                    log::error!("{:#}", error);
                    return Err(error);
                }
            }
        }
        Ok(config)
    }
}
