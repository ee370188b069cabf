mod bulk_email;
mod health_check;
mod index;
mod notifications;
mod users;

pub use bulk_email::*;
pub use health_check::*;
pub use index::*;
pub use notifications::*;
pub use users::*;
