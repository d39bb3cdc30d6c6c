// src/lib.rs

//! Maisho Crawler Library

pub mod error;
pub mod furigana;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod utils;
