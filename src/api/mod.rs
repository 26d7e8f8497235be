pub mod cors;
pub mod endpoints;
pub mod middleware;
pub mod rest;
pub mod routes;
pub mod state;
