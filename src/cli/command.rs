use std::path::PathBuf;

pub enum Command {
    // Listing and search
    ListJobs {
        query: Option<String>,
    },
    JobsInRadius {
        zipcode: String,
        distance: f64,
    },
    JobStats {
        topic: String,
    },
    // Single postings
    GetJob {
        id: String,
        slug: String,
    },
    NewJob {
        file: PathBuf,
    },
    UpdateJob {
        id: String,
        file: PathBuf,
    },
    DeleteJob {
        id: String,
    },
}
