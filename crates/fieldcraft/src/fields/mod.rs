//! Built-in field types.

mod boolean;
mod choice;
mod coalesce;
mod datetime;
mod lambda;
mod list;
mod number;
mod related;
mod text;

pub use boolean::Bool;
pub use choice::{Enum, MultiChoice};
pub use coalesce::Coalesce;
pub use datetime::{DEFAULT_DATETIME_FORMAT, Datetime};
pub use lambda::Lambda;
pub use list::List;
pub use number::{Float, Integer};
pub use related::{Related, SelfRelated};
pub use text::Text;
