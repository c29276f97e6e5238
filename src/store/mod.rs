// src/store/mod.rs

pub mod companies;
pub mod contacts;
pub mod guest;
pub mod messages;
pub mod profiles;

pub use companies::{Company, CompanyRepository};
pub use contacts::{Contact, ContactRepository, NewContact};
pub use guest::{
    GuestContact, GuestMessage, GuestProfile, GuestStore, GuestSummary, NewGuestContact,
    NewGuestProfile,
};
pub use messages::{MessageRepository, SavedMessageVersion};
pub use profiles::{ProfileRepository, UserProfile, UserSummary};
