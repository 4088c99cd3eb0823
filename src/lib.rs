//! slircd-track - nickname/hostmask tracking for IRC bots.
//!
//! The [`track`] plugin watches NICK, JOIN and WHO traffic and stores every
//! (nickname, hostname) pair it sees in SQLite. Users query the data with
//! `nicklist`, `hostlist`, `stats` and `trackdump`.
//!
//! The [`host`] module is a small plugin host that connects the plugin to a
//! live connection; the `trackbot` binary wires it to the `irc` client.

pub mod casemap;
pub mod config;
pub mod db;
pub mod error;
pub mod host;
pub mod plugin;
pub mod track;

pub use track::TrackPlugin;
