use super::{recipient_email::RecipientEmail, recipient_name::RecipientName};

/// A validated name/address pair for a single templated notification.
#[derive(Debug, Clone)]
pub struct NewRecipient {
    pub name: RecipientName,
    pub email: RecipientEmail,
}

impl NewRecipient {
    pub fn parse(name: String, email: String) -> Result<Self, String> {
        let name = RecipientName::parse(name)?;
        let email = RecipientEmail::parse(email)?;
        Ok(Self { name, email })
    }
}
