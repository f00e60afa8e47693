mod authority;
mod bypass;
mod visibility;
