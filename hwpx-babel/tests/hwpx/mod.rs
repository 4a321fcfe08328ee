mod package;
mod references;
