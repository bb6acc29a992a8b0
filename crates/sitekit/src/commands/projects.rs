//! Portfolio project presentation.

use tabled::Tabled;

use sitekit_core::{CreateProjectRequest, Project, UpdateProjectRequest};

use crate::output::truncate;

use super::blogs::join_or_dash;
use super::resource::Presented;

#[derive(Tabled)]
pub struct ProjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Tech")]
    technologies: String,
}

impl Presented for Project {
    type Create = CreateProjectRequest;
    type Update = UpdateProjectRequest;
    type Row = ProjectRow;

    fn row(&self) -> ProjectRow {
        ProjectRow {
            id: self.id.clone(),
            title: truncate(&self.title, 40),
            category: self.category.clone().unwrap_or_default(),
            client: self.client.clone().unwrap_or_default(),
            status: self.status.to_string(),
            technologies: truncate(&self.technologies.join(", "), 32),
        }
    }

    fn detail(&self) -> String {
        let lines = [
            format!("ID:           {}", self.id),
            format!("Title:        {}", self.title),
            format!("Slug:         {}", self.slug.as_deref().unwrap_or("-")),
            format!("Status:       {}", self.status),
            format!("Category:     {}", self.category.as_deref().unwrap_or("-")),
            format!("Client:       {}", self.client.as_deref().unwrap_or("-")),
            format!("Technologies: {}", join_or_dash(&self.technologies)),
            format!("Live:         {}", self.live_url.as_deref().unwrap_or("-")),
            format!("Source:       {}", self.github_url.as_deref().unwrap_or("-")),
            format!("Featured:     {}", self.featured),
            String::new(),
            self.description.clone(),
        ];
        lines.join("\n")
    }
}
