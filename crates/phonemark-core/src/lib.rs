pub mod batch;
pub mod domain;
pub mod error;
pub mod request;

pub use batch::{collect_phone_numbers, PhoneBatch};
pub use domain::*;
pub use error::{CoreError, ErrorKind};
pub use request::{PhoneNumber, UpdateRequest, ValidatedNames};
