//! Service manifest consulted by the client factory.

/// A client the factory knows how to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Lookup name, lowercase.
    pub name: &'static str,
    /// Namespace recorded in the client's config.
    pub namespace: &'static str,
    pub description: &'static str,
}

const MANIFEST: &[ServiceDescriptor] = &[ServiceDescriptor {
    name: "tracker",
    namespace: "Tracker",
    description: "Page and event tracking with cookie-backed visitor state",
}];

/// Find a service by name, ignoring case.
pub fn lookup_service(name: &str) -> Option<&'static ServiceDescriptor> {
    let name = name.to_ascii_lowercase();
    MANIFEST.iter().find(|service| service.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let service = lookup_service("Tracker").unwrap();
        assert_eq!(service.name, "tracker");
        assert_eq!(service.namespace, "Tracker");
        assert_eq!(lookup_service("TRACKER"), Some(service));
    }

    #[test]
    fn unknown_service() {
        assert!(lookup_service("sites").is_none());
        assert!(lookup_service("").is_none());
    }
}
