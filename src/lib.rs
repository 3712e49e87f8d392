//! Shoebill Updater - keeps a server's Shoebill components current
//!
//! Inventories the installed launcher, dependency manager and native plugin,
//! reports their digests to the update server and lists or applies the
//! replacements it offers.

pub mod engine;
