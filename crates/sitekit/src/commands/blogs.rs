//! Blog post presentation.

use tabled::Tabled;

use sitekit_core::{BlogPost, CreateBlogRequest, UpdateBlogRequest};

use crate::output::truncate;

use super::resource::Presented;

#[derive(Tabled)]
pub struct BlogRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Featured")]
    featured: &'static str,
    #[tabled(rename = "Views")]
    views: u64,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl Presented for BlogPost {
    type Create = CreateBlogRequest;
    type Update = UpdateBlogRequest;
    type Row = BlogRow;

    fn row(&self) -> BlogRow {
        BlogRow {
            id: self.id.clone(),
            title: truncate(&self.title, 48),
            category: self.category.clone().unwrap_or_default(),
            status: self.status.to_string(),
            featured: if self.featured { "★" } else { "" },
            views: self.views,
            updated: self
                .updated_at
                .or(self.created_at)
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("ID:        {}", self.id),
            format!("Title:     {}", self.title),
            format!("Slug:      {}", self.slug),
            format!("Status:    {}", self.status),
            format!("Author:    {}", self.author.as_deref().unwrap_or("-")),
            format!("Category:  {}", self.category.as_deref().unwrap_or("-")),
            format!("Tags:      {}", join_or_dash(&self.tags)),
            format!("Featured:  {}", self.featured),
            format!("Views:     {}", self.views),
        ];
        if let Some(minutes) = self.read_time {
            lines.push(format!("Read time: {minutes} min"));
        }
        if let Some(created) = self.created_at {
            lines.push(format!("Created:   {}", created.format("%Y-%m-%d %H:%M UTC")));
        }
        if let Some(updated) = self.updated_at {
            lines.push(format!("Updated:   {}", updated.format("%Y-%m-%d %H:%M UTC")));
        }
        if let Some(excerpt) = &self.excerpt {
            lines.push(String::new());
            lines.push(excerpt.clone());
        }
        lines.join("\n")
    }
}

pub(super) fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".into()
    } else {
        values.join(", ")
    }
}
