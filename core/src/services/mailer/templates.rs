//! Embedded email templates and the placeholder renderer

use super::service::MailerError;

pub(crate) const VERIFICATION_EMAIL: &str = "<p>Please click the following link to verify your \
     email address: <a href=\"{{link}}\">{{link}}</a></p>";

pub(crate) const PASSWORD_RESET_EMAIL: &str = "<p>To reset your password, please click the \
     following link: <a href=\"{{link}}\">{{link}}</a></p>";

/// Substitutes `{{key}}` placeholders in a template
///
/// Rendering is strict: a placeholder left unfilled is an error, never
/// silently shipped to a recipient.
pub(crate) fn render(template: &str, values: &[(&str, &str)]) -> Result<String, MailerError> {
    let mut rendered = template.to_string();
    for (key, value) in values {
        rendered = rendered.replace(&format!("{{{{{}}}}}", key), value);
    }
    if let Some(start) = rendered.find("{{") {
        let end = rendered[start..]
            .find("}}")
            .map(|offset| start + offset + 2)
            .unwrap_or(rendered.len());
        return Err(MailerError::UnfilledPlaceholder(
            rendered[start..end].to_string(),
        ));
    }
    Ok(rendered)
}
