pub mod db_type;
pub mod ident;
pub mod phone;
pub mod variants;

pub use db_type::DbType;
pub use ident::Identifier;
pub use phone::{normalize, normalize_phone, CanonicalPhone, RawPhoneValue};
pub use variants::{expand, hyphenate, strip_separators, PhoneVariants};
