mod helpers;
mod mileapp;
mod service;
mod shoptree;
