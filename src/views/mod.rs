pub mod account;
pub mod catalog;
pub mod chat;
pub mod shared;

pub use account::AccountView;
pub use catalog::{FavoritesList, MovieList, SearchBar};
pub use chat::{ChatView, ReminderButton};
