mod blocks;
mod lists;
mod policy;
