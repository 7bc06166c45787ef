pub mod analytics;
pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod filler;
pub mod generator;
pub mod history;
pub mod mood;
pub mod pattern;
pub mod quality;
pub mod ring;
pub mod wordbank;
