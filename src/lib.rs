//! REST backend for Homly, a multi-vendor local commerce platform: catalog,
//! stores, orders with coin and Gold delivery waivers, bookable services,
//! content and admin settings.

pub mod app;
pub mod config;
pub mod dto;
pub mod handler;
pub mod middlewares;
pub mod model;
pub mod repository;
pub mod router;
pub mod service;
pub mod storefront;
pub mod util;
