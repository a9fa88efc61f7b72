//! Domain types.
//!
//! These types represent validated domain objects, separate from
//! database row and document representations. Field invariants (price,
//! role, email, username) are carried by the `plaza-core` value types;
//! the remaining record-level invariants are enforced by the `New*`
//! input forms here.

pub mod activity;
pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use activity::{AdminLogEntry, BrowsingEvent, ErrorLogEntry, Notification, WishlistEntry};
pub use cart::CartItem;
pub use category::{Category, CategoryFieldError, NewCategory};
pub use order::{Order, OrderItem};
pub use product::{NewProduct, Product, ProductFieldError, ProductUpdate};
pub use user::{NewUser, User};
