//! Shared, replace-on-write settings snapshot.

mod manager;

#[cfg(test)]
mod tests;

pub use manager::SettingsStore;
