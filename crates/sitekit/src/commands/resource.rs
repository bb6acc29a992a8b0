//! Generic list/get/create/update/delete handlers shared by every collection.

use std::sync::Arc;

use owo_colors::OwoColorize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tabled::Tabled;

use sitekit_core::{
    Backend, FilterKey, ListOptions, ListView, ListViewState, LoadOutcome, MutationCoordinator,
    Operation, Resource,
};

use crate::cli::{GlobalOpts, ListArgs, OutputFormat, ResourceArgs, ResourceCommand};
use crate::error::CliError;
use crate::notify::CliNotifier;
use crate::output;

use super::util;

/// How a collection is shown and which payloads it accepts.
pub trait Presented: Resource {
    type Create: DeserializeOwned + Serialize + Sync;
    type Update: DeserializeOwned + Serialize + Sync;
    type Row: Tabled;

    fn row(&self) -> Self::Row;

    fn detail(&self) -> String;
}

pub async fn handle<R: Presented>(
    backend: &Backend,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ResourceCommand::List(list_args) => list::<R>(backend, &list_args, global).await,

        ResourceCommand::Get { id, track_view } => {
            let controller = backend.collection::<R>();
            let fallback = Operation::Get.failure_message(&R::KIND);
            let item = if track_view {
                controller.view(&id).await
            } else {
                controller.get_one(&id).await
            }
            .map_err(|e| CliError::from_core(e, &fallback))?;
            print_single(&item, global)
        }

        ResourceCommand::Create(payload) => {
            let body: R::Create = util::parse_payload(&payload)?;
            let fallback = Operation::Create.failure_message(&R::KIND);
            let created = mutations::<R>(backend, global)
                .create(&body)
                .await
                .map_err(|e| CliError::from_core(e, &fallback))?;
            print_single(&created, global)
        }

        ResourceCommand::Update { id, payload } => {
            let patch: R::Update = util::parse_payload(&payload)?;
            let fallback = Operation::Update.failure_message(&R::KIND);
            let updated = mutations::<R>(backend, global)
                .update(&id, &patch)
                .await
                .map_err(|e| CliError::from_core(e, &fallback))?;
            print_single(&updated, global)
        }

        ResourceCommand::Delete { id } => {
            let prompt = format!("Delete {} {id}?", R::KIND.singular);
            if !util::confirm(&prompt, &format!("delete {} {id}", R::KIND.singular), global.yes)? {
                return Ok(());
            }
            let fallback = Operation::Delete.failure_message(&R::KIND);
            mutations::<R>(backend, global)
                .delete(&id)
                .await
                .map_err(|e| CliError::from_core(e, &fallback))
        }
    }
}

fn mutations<R: Resource>(backend: &Backend, global: &GlobalOpts) -> MutationCoordinator<R> {
    let notifier = CliNotifier::new(global.quiet, output::should_color(global.color));
    MutationCoordinator::new(backend.collection(), Arc::new(notifier))
}

fn print_single<R: Presented>(item: &R, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.format(), item, R::detail, |r| r.id().to_owned())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── List ────────────────────────────────────────────────────────────

async fn list<R: Presented>(
    backend: &Backend,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = R::KIND;
    let filters = FilterKey::from_selection(
        &kind,
        args.search.as_deref().unwrap_or_default(),
        args.status.as_deref().unwrap_or_default(),
        args.category.as_deref().unwrap_or_default(),
    );

    let accumulate = args.all || args.pages.is_some();
    let mut options = if accumulate {
        ListOptions::feed()
    } else {
        ListOptions::admin()
    }
    .with_filters(filters);
    if let Some(limit) = args.limit {
        options = options.with_page_size(limit);
    }

    let view: ListView<R> = backend.list_view(options);
    let fallback = Operation::List.failure_message(&kind);
    let settle = |outcome: LoadOutcome| {
        outcome
            .into_result()
            .map_err(|e| CliError::from_core(e, &fallback))
    };

    let first = match args.page {
        Some(page) if page > 1 => view.go_to_page(page).await,
        _ => view.mount().await,
    };
    settle(first)?;

    if accumulate {
        let target = args.pages.unwrap_or(u32::MAX);
        while view.snapshot().current_page < target {
            if !settle(view.load_more().await)? {
                break;
            }
        }
    }

    let state = view.snapshot();
    view.dispose();

    let out = output::render_list(global.format(), &state.items, R::row, |r| r.id().to_owned())?;
    output::print_output(&out, global.quiet);

    if global.format() == OutputFormat::Table && !global.quiet {
        let footer = summary(&state, kind.plural);
        if output::should_color(global.color) {
            eprintln!("{}", footer.dimmed());
        } else {
            eprintln!("{footer}");
        }
    }
    Ok(())
}

fn summary<T>(state: &ListViewState<T>, plural: &str) -> String {
    if state.items.is_empty() {
        return format!("No {plural} found");
    }
    format!(
        "Showing {} of {} {plural} (page {} of {})",
        state.items.len(),
        state.total_count,
        state.current_page,
        state.total_pages.max(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_position() {
        let state = ListViewState {
            items: vec![1, 2, 3],
            current_page: 1,
            total_pages: 3,
            total_count: 23,
            ..ListViewState::default()
        };
        assert_eq!(summary(&state, "blogs"), "Showing 3 of 23 blogs (page 1 of 3)");
        assert_eq!(
            summary(&ListViewState::<u8>::default(), "services"),
            "No services found"
        );
    }
}
