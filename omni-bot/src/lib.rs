//! # OMNICore bot platform
//!
//! A Telegram bot and an HTTP server sharing one SQLite database. Core types (Handler, Bot,
//! Message) live in [`core`], the handler chain in [`chain`], the Telegram transport in
//! [`telegram`]. [`components`] assembles the services and [`runner::run_bot`] starts them.

pub mod chain;
pub mod cli;
pub mod components;
pub mod config;
pub mod content;
pub mod core;
pub mod handlers;
pub mod llm;
pub mod monitoring;
pub mod payments;
pub mod plugins;
pub mod runner;
pub mod server;
pub mod telegram;
pub mod updates;

pub use cli::{load_config, Cli, Commands};

pub use crate::core::{
    init_tracing, Bot, Chat, Handler, HandlerError, HandlerResponse, Message, MessageDirection,
    OmniError, Result, ToCoreMessage, ToCoreUser, User,
};

pub use chain::HandlerChain;

pub use components::{build_app_state, build_components, build_handler_chain, AppComponents};
pub use config::{BotConfig, ConfigStore};
pub use runner::run_bot;
