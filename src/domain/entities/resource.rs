use std::fmt;

/// Content collections exposed under `/api/{route}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Blog,
    Job,
    Team,
    Gallery,
    About,
    News,
    LegalServices,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Blog,
        Resource::Job,
        Resource::Team,
        Resource::Gallery,
        Resource::About,
        Resource::News,
        Resource::LegalServices,
    ];

    /// Path segment the resource is mounted on.
    pub fn route(&self) -> &'static str {
        match self {
            Resource::Blog => "blog",
            Resource::Job => "job",
            Resource::Team => "team",
            Resource::Gallery => "gallery",
            Resource::About => "about",
            Resource::News => "news",
            Resource::LegalServices => "legalServices",
        }
    }

    /// Collection name used in the document store.
    pub fn collection(&self) -> &'static str {
        match self {
            Resource::Blog => "blogs",
            Resource::Job => "jobs",
            Resource::Team => "teams",
            Resource::Gallery => "galleries",
            Resource::About => "abouts",
            Resource::News => "news",
            Resource::LegalServices => "legal_services",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Resource::Blog => "Blog",
            Resource::Job => "Job",
            Resource::Team => "Team member",
            Resource::Gallery => "Gallery item",
            Resource::About => "About",
            Resource::News => "News",
            Resource::LegalServices => "Legal service",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}
