mod new_recipient;
mod recipient;
mod recipient_email;
mod recipient_name;
mod role;

pub use new_recipient::NewRecipient;
pub use recipient::Recipient;
pub use recipient_email::RecipientEmail;
pub use recipient_name::RecipientName;
pub use role::Role;
