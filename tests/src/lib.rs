#![cfg(test)]

mod discovery;
mod dispatch;
mod loading;
mod util;
