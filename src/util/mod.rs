pub mod cloudinary;
pub mod email;
pub mod error;
pub mod events;
pub mod image;
pub mod jwt;
pub mod logger;
pub mod notice;
pub mod password;
pub mod password_reset;
pub mod telegram;
