//! Service catalog presentation.

use tabled::Tabled;

use sitekit_core::{CreateServiceRequest, Service, UpdateServiceRequest};

use crate::output::truncate;

use super::blogs::join_or_dash;
use super::resource::Presented;

#[derive(Tabled)]
pub struct ServiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "#")]
    order: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl Presented for Service {
    type Create = CreateServiceRequest;
    type Update = UpdateServiceRequest;
    type Row = ServiceRow;

    fn row(&self) -> ServiceRow {
        ServiceRow {
            id: self.id.clone(),
            order: self.order.map(|o| o.to_string()).unwrap_or_default(),
            title: truncate(&self.title, 40),
            category: self.category.clone().unwrap_or_default(),
            price: self.price.clone().unwrap_or_default(),
            status: self.status.to_string(),
        }
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("ID:        {}", self.id),
            format!("Title:     {}", self.title),
            format!("Status:    {}", self.status),
            format!("Category:  {}", self.category.as_deref().unwrap_or("-")),
            format!("Price:     {}", self.price.as_deref().unwrap_or("-")),
            format!("Features:  {}", join_or_dash(&self.features)),
        ];
        if let Some(summary) = &self.short_description {
            lines.push(format!("Summary:   {summary}"));
        }
        lines.push(String::new());
        lines.push(self.description.clone());
        lines.join("\n")
    }
}
