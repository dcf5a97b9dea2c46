#![cfg(test)]

mod audit;
mod lab;
