pub const REDACTED: &str = "[REDACTED]";

/// Secrets this short are left alone; replacing them would mangle ordinary
/// words in the message.
const MIN_SECRET_LEN: usize = 8;

pub fn redact_secrets<'a, I>(message: &str, secrets: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    secrets
        .into_iter()
        .filter(|secret| secret.len() > MIN_SECRET_LEN)
        .fold(message.to_string(), |message, secret| {
            message.replace(secret, REDACTED)
        })
}
