//! Folds raw scheduler records into the client's application and cell model.

use std::collections::BTreeMap;

use tracing::warn;

use lattice_common::{
    ApplicationInfo, CellInfo, InstanceInfo, InstanceState, RouteTable, Routes, ROUTER_KEY,
};

use crate::wire::{ActualLrpResponse, CellResponse, DesiredLrpResponse};

/// Joins desired and actual LRPs by process guid.
///
/// Actual LRPs without a desired counterpart still produce an application
/// (with zero desired instances). Output is sorted by process guid and each
/// application's instances by index.
pub fn merge_applications(
    desired: Vec<DesiredLrpResponse>,
    actual: Vec<ActualLrpResponse>,
) -> Vec<ApplicationInfo> {
    let mut by_guid: BTreeMap<String, ApplicationInfo> = desired
        .into_iter()
        .map(|lrp| (lrp.process_guid.clone(), desired_to_application(lrp)))
        .collect();

    for lrp in actual {
        let app = by_guid
            .entry(lrp.process_guid.clone())
            .or_insert_with(|| ApplicationInfo {
                process_guid: lrp.process_guid.clone(),
                ..Default::default()
            });
        app.actual_instances.push(actual_to_instance(lrp));
    }

    by_guid.into_values().map(finish_application).collect()
}

/// Builds a single application from its desired LRP and that LRP's actuals.
pub fn application_info(
    desired: DesiredLrpResponse,
    actual: Vec<ActualLrpResponse>,
) -> ApplicationInfo {
    let mut app = desired_to_application(desired);
    app.actual_instances = actual.into_iter().map(actual_to_instance).collect();
    finish_application(app)
}

/// One row per known cell, plus a `missing` row for every cell id that an
/// actual LRP references but the cell list does not contain. Sorted by cell id.
pub fn merge_cells(cells: Vec<CellResponse>, actual: &[ActualLrpResponse]) -> Vec<CellInfo> {
    let mut by_id: BTreeMap<String, CellInfo> = cells
        .into_iter()
        .map(|cell| (cell.cell_id.clone(), CellInfo::new(cell.cell_id, 0, 0)))
        .collect();

    for lrp in actual {
        if lrp.cell_id.is_empty() {
            continue;
        }
        let cell = by_id
            .entry(lrp.cell_id.clone())
            .or_insert_with(|| CellInfo::missing(lrp.cell_id.clone()));
        match InstanceState::from_label(&lrp.state) {
            InstanceState::Running => cell.running_instances += 1,
            InstanceState::Claimed => cell.claimed_instances += 1,
            _ => {}
        }
    }

    by_id.into_values().collect()
}

/// Extracts the port -> hostnames table; a malformed router payload yields
/// no routes.
pub fn route_table(routes: &Routes) -> RouteTable {
    routes.table().unwrap_or_else(|err| {
        warn!(%err, "ignoring malformed {} route payload", ROUTER_KEY);
        RouteTable::new()
    })
}

fn desired_to_application(lrp: DesiredLrpResponse) -> ApplicationInfo {
    ApplicationInfo {
        routes: route_table(&lrp.routes),
        process_guid: lrp.process_guid,
        desired_instances: lrp.instances,
        actual_running_instances: 0,
        disk_mb: lrp.disk_mb,
        memory_mb: lrp.memory_mb,
        cpu_weight: lrp.cpu_weight,
        ports: lrp.ports,
        stack: lrp.stack,
        start_timeout: lrp.start_timeout,
        annotation: lrp.annotation,
        environment_variables: lrp.env,
        actual_instances: Vec::new(),
    }
}

fn actual_to_instance(lrp: ActualLrpResponse) -> InstanceInfo {
    InstanceInfo {
        index: lrp.index,
        state: InstanceState::from_label(&lrp.state),
        instance_guid: lrp.instance_guid,
        cell_id: lrp.cell_id,
        ip: lrp.address,
        ports: lrp.ports,
        crash_count: lrp.crash_count,
        since: lrp.since,
        placement_error: Some(lrp.placement_error).filter(|e| !e.is_empty()),
    }
}

fn finish_application(mut app: ApplicationInfo) -> ApplicationInfo {
    app.actual_instances.sort_by_key(|instance| instance.index);
    app.actual_running_instances = app
        .actual_instances
        .iter()
        .filter(|instance| instance.state == InstanceState::Running)
        .count() as u32;
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn desired(guid: &str, instances: u32) -> DesiredLrpResponse {
        DesiredLrpResponse {
            process_guid: guid.to_string(),
            instances,
            ports: vec![8080],
            ..Default::default()
        }
    }

    fn actual(guid: &str, index: u32, state: &str, cell: &str) -> ActualLrpResponse {
        ActualLrpResponse {
            process_guid: guid.to_string(),
            index,
            state: state.to_string(),
            cell_id: cell.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_applications_counts_running_and_sorts() {
        let apps = merge_applications(
            vec![desired("zeta", 2), desired("alpha", 3)],
            vec![
                actual("alpha", 2, "RUNNING", "cell-1"),
                actual("alpha", 0, "RUNNING", "cell-2"),
                actual("alpha", 1, "CRASHED", ""),
                actual("zeta", 0, "CLAIMED", "cell-1"),
            ],
        );

        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].process_guid, "alpha");
        assert_eq!(apps[0].actual_running_instances, 2);
        let indices: Vec<u32> = apps[0].actual_instances.iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(apps[1].process_guid, "zeta");
        assert_eq!(apps[1].actual_running_instances, 0);
    }

    #[test]
    fn test_merge_applications_keeps_orphan_actuals() {
        let apps = merge_applications(vec![], vec![actual("ghost", 0, "RUNNING", "cell-1")]);
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].desired_instances, 0);
        assert_eq!(apps[0].actual_running_instances, 1);
    }

    #[test]
    fn test_desired_routes_become_route_table() {
        let lrp: DesiredLrpResponse = serde_json::from_value(json!({
            "process_guid": "web",
            "instances": 1,
            "ports": [8080],
            "routes": {"cf-router": [{"hostnames": ["web.example.com"], "port": 8080}]}
        }))
        .unwrap();

        let app = application_info(lrp, vec![]);
        assert_eq!(app.routes.get(&8080).unwrap(), &vec!["web.example.com"]);
    }

    #[test]
    fn test_route_table_ignores_malformed_payload() {
        let routes: Routes = serde_json::from_value(json!({"cf-router": {"not": "a list"}})).unwrap();
        assert!(route_table(&routes).is_empty());
    }

    #[test]
    fn test_merge_cells_tallies_and_flags_missing() {
        let cells = vec![
            CellResponse { cell_id: "cell-2".to_string(), ..Default::default() },
            CellResponse { cell_id: "cell-1".to_string(), ..Default::default() },
        ];
        let actuals = vec![
            actual("a", 0, "RUNNING", "cell-1"),
            actual("a", 1, "RUNNING", "cell-1"),
            actual("a", 2, "CLAIMED", "cell-1"),
            actual("b", 0, "RUNNING", "cell-9"),
            actual("b", 1, "UNCLAIMED", ""),
        ];

        let merged = merge_cells(cells, &actuals);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0], CellInfo::new("cell-1", 2, 1));
        assert_eq!(merged[1], CellInfo::new("cell-2", 0, 0));
        assert_eq!(merged[2].cell_id, "cell-9");
        assert!(merged[2].missing);
        assert_eq!(merged[2].running_instances, 1);
    }

    #[test]
    fn test_placement_error_empty_string_is_none() {
        let instance = actual_to_instance(actual("a", 0, "UNCLAIMED", ""));
        assert_eq!(instance.placement_error, None);
        assert_eq!(instance.state, InstanceState::Unclaimed);
    }
}
