use planet_graph::components::planet_graph::{AssetRegistry, GraphData, ViewModel};

const SNAPSHOT: &str = r#"{
	"nodes": [
		{ "id": "a", "label": "Alpha", "community": 1, "level": 0, "degree": 2 },
		{ "id": "b", "label": "Beta", "community": 1, "level": 0, "degree": 0 },
		{ "id": "c", "label": "Gamma", "community": null, "level": null, "degree": 5 }
	],
	"edges": [
		{ "id": "e1", "source": "a", "target": "b", "weight": 3 },
		{ "id": "e2", "source": "a", "target": "zzz", "weight": null, "description": "orphan" }
	]
}"#;

#[test]
fn snapshot_to_view_model() {
	let graph = GraphData::from_json(SNAPSHOT).expect("snapshot parses");
	let mut assets = AssetRegistry::new();
	assets.ensure(graph.community_count().max(6));

	let view = ViewModel::build(&graph, &assets);

	assert_eq!(view.nodes.len(), 3);
	let labels: Vec<_> = view.nodes.iter().map(|n| (n.id.as_str(), n.display_group)).collect();
	assert_eq!(labels, vec![("a", 1), ("b", 1), ("c", 2)]);
	assert_eq!(view.nodes[2].group, -1);
	assert_eq!(view.nodes[2].size_value, 5.0);
	assert_eq!(view.nodes[1].size_value, 1.0);
	assert_eq!(view.nodes[0].asset_index, 0);
	assert_eq!(view.nodes[2].asset_index, 1);

	assert_eq!(view.edges.len(), 1);
	let edge = &view.edges[0];
	assert_eq!(edge.id, "e1");
	assert_eq!(edge.source.id, "a");
	assert_eq!(edge.target.id, "b");
	assert_eq!(edge.visual_weight, 3.0);

	let legend: Vec<_> = view.legend.iter().map(|e| (e.community, e.label, e.count)).collect();
	assert_eq!(legend, vec![(1, 1, 2), (-1, 2, 1)]);
	assert_eq!(view.legend[0].planet_name, "Aqua Atlas");
}

#[test]
fn bundled_dataset_is_valid() {
	let graph = GraphData::from_json(include_str!("../data/graph.json")).expect("dataset parses");
	let stats = graph.stats();
	assert_eq!(stats.communities, 5);

	let mut assets = AssetRegistry::new();
	assets.ensure(stats.communities.max(6));
	let view = ViewModel::build(&graph, &assets);
	assert_eq!(view.nodes.len(), stats.nodes);
	assert_eq!(view.edges.len(), stats.edges);
	assert_eq!(view.legend.iter().map(|e| e.count).sum::<usize>(), stats.nodes);
}

#[test]
fn duplicate_ids_are_rejected() {
	let text = r#"{ "nodes": [
		{ "id": "a", "label": "A", "community": 1, "level": 0, "degree": 0 },
		{ "id": "a", "label": "A again", "community": 1, "level": 0, "degree": 0 }
	], "edges": [] }"#;
	let err = GraphData::from_json(text).unwrap_err();
	assert_eq!(err.to_string(), "node id `a` appears more than once");
}
