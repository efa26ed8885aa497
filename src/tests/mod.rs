mod shorten;
mod stats;
