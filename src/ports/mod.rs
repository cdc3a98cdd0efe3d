// src/ports/mod.rs
pub mod notice;

pub use notice::NoticePresenter;
