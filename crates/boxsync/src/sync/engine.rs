//! Creation and reconciliation flows.
//!
//! Both flows are strictly sequential: each row's refresh may itself trigger
//! a second write against a different row (the retiring-date side patch),
//! and the platform's quota bounds throughput anyway, so there is nothing to
//! gain from batching or concurrency here.

use super::filter::filter_new;
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{ReconcileResult, Result, SeedResult};
use crate::htb::{HtbClient, LifecycleStatus, MachineCategory};
use crate::notion::{NotionClient, PropertyMode, TrackedRow, cover_url, map_to_properties, retiring_date_patch};

/// Create rows for every machine in `category` that is not yet tracked.
///
/// Fetches the category list, drops machines whose ID already appears in the
/// snapshot, then creates one row per remaining machine in platform order:
/// tag fetch, full property map, row create.
pub async fn seed_category(
    source: &HtbClient,
    sink: &NotionClient,
    snapshot: &[TrackedRow],
    category: MachineCategory,
    on_progress: Option<&ProgressCallback>,
) -> Result<SeedResult> {
    let label = category.label();

    emit(
        on_progress,
        SyncProgress::FetchingMachines {
            category: label.to_string(),
        },
    );

    let machines = source.list_machines(category).await?;
    let fetched = machines.len();

    emit(
        on_progress,
        SyncProgress::FetchComplete {
            category: label.to_string(),
            total: fetched,
        },
    );

    let fresh = filter_new(snapshot, machines);
    let skipped = fetched - fresh.len();
    let total = fresh.len();

    emit(
        on_progress,
        SyncProgress::CreatingRows {
            category: label.to_string(),
            fresh: total,
            skipped,
        },
    );

    let status = LifecycleStatus::from(category);

    for (index, machine) in fresh.iter().enumerate() {
        let tags = source.get_tags(machine.id).await?;

        let retiring_box = machine
            .retiring
            .as_ref()
            .map(|rel| rel.name.as_str())
            .unwrap_or("");
        let properties =
            map_to_properties(machine, &tags, status, retiring_box, PropertyMode::Full);
        let cover = cover_url(source.host(), machine);

        sink.create_row(properties, cover.as_deref()).await?;

        tracing::debug!(id = machine.id, name = %machine.name, category = label, "Created row");
        emit(
            on_progress,
            SyncProgress::RowCreated {
                id: machine.id,
                name: machine.name.clone(),
                index: index + 1,
                total,
            },
        );
    }

    Ok(SeedResult {
        fetched,
        skipped,
        created: total,
    })
}

/// Refresh every tracked row from current platform state.
///
/// The snapshot must be taken before any mutation; rows are processed in
/// snapshot order. The unreleased collection is fetched once up front and
/// cross-referenced per row to derive the lifecycle status, instead of once
/// per row.
///
/// When an unreleased machine carries a retiring relation, the tracked row
/// of the relation's target gets its `Retiring Date` patched to the
/// unreleased machine's release timestamp. A relation whose target has no
/// tracked row is surfaced as a warning and skipped.
pub async fn reconcile_rows(
    source: &HtbClient,
    sink: &NotionClient,
    snapshot: &[TrackedRow],
    on_progress: Option<&ProgressCallback>,
) -> Result<ReconcileResult> {
    let mut result = ReconcileResult::default();
    let total = snapshot.len();

    emit(on_progress, SyncProgress::Reconciling { total });

    let unreleased = source.list_machines(MachineCategory::Unreleased).await?;

    for (index, row) in snapshot.iter().enumerate() {
        let machine = source.get_machine(row.machine_id).await?;

        let (status, retiring_box) =
            match unreleased.iter().find(|entry| entry.id == machine.id) {
                Some(entry) => {
                    if let Some(rel) = &entry.retiring {
                        match snapshot.iter().find(|r| r.machine_id == rel.id) {
                            Some(target) => {
                                sink.patch_row(
                                    &target.page_id,
                                    retiring_date_patch(&entry.release),
                                )
                                .await?;
                                result.retiring_patched += 1;
                                emit(
                                    on_progress,
                                    SyncProgress::RetiringDatePatched {
                                        id: entry.id,
                                        target_id: rel.id,
                                    },
                                );
                            }
                            None => {
                                result.retiring_missing += 1;
                                tracing::warn!(
                                    id = entry.id,
                                    target_id = rel.id,
                                    target_name = %rel.name,
                                    "Retiring target has no tracked row, skipping date patch"
                                );
                                emit(
                                    on_progress,
                                    SyncProgress::RetiringTargetMissing {
                                        id: entry.id,
                                        target_id: rel.id,
                                    },
                                );
                            }
                        }
                    }

                    let name = entry
                        .retiring
                        .as_ref()
                        .map(|rel| rel.name.clone())
                        .unwrap_or_default();
                    (LifecycleStatus::Unreleased, name)
                }
                None => {
                    let status = if machine.retired.unwrap_or(false) {
                        LifecycleStatus::Retired
                    } else {
                        LifecycleStatus::Active
                    };
                    (status, String::new())
                }
            };

        let tags = source.get_tags(machine.id).await?;
        let properties =
            map_to_properties(&machine, &tags, status, &retiring_box, PropertyMode::Partial);
        sink.patch_row(&row.page_id, properties).await?;

        match status {
            LifecycleStatus::Unreleased => result.unreleased += 1,
            LifecycleStatus::Active => result.active += 1,
            LifecycleStatus::Retired => result.retired += 1,
        }
        result.processed += 1;

        tracing::debug!(
            id = machine.id,
            name = %machine.name,
            status = status.as_str(),
            "Reconciled row"
        );
        emit(
            on_progress,
            SyncProgress::RowReconciled {
                id: machine.id,
                name: machine.name.clone(),
                status: status.as_str().to_string(),
                index: index + 1,
                total,
            },
        );
    }

    Ok(result)
}
