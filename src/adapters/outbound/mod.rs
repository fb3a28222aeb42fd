mod maxmind_resolver;

pub use maxmind_resolver::MaxMindResolver;
