//! GitHub REST API integration.

mod client;
mod dto;

pub use client::GitHubClient;
