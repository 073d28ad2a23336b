use leptos::prelude::*;
use log::error;

use crate::components::planet_graph::{GraphData, GraphDataError, GraphStats, PlanetGraph};

/// Dataset bundled with the app.
const DATASET: &str = include_str!("../../data/graph.json");

fn load_dataset() -> Result<GraphData, GraphDataError> {
	GraphData::from_json(DATASET).inspect_err(|e| error!("planet-graph: {e}"))
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! The graph data could not be loaded."</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>{load_dataset().map(|graph| view! { <GraphPage graph /> })}</ErrorBoundary>
	}
}

#[component]
fn GraphPage(graph: GraphData) -> impl IntoView {
	let GraphStats { nodes, edges, communities } = graph.stats();
	let data = Signal::derive(move || graph.clone());

	view! {
		<main class="graph-page">
			<header class="graph-header">
				<p class="graph-kicker">"🛰️ Knowledge Graph"</p>
				<h1>"Navigate the Space Biology Universe"</h1>
				<p class="subtitle">
					"Each planetary cluster groups related experiments, assays and publications. Hover a planet or a connection for details, drag to move, scroll to zoom."
				</p>
			</header>

			<div class="graph-stats">
				<Stat value=nodes title="Nodes" blurb="Unique experiments, assays, and publications." />
				<Stat
					value=edges
					title="Connections"
					blurb="Knowledge links mapped across the repository."
				/>
				<Stat
					value=communities
					title="Communities"
					blurb="Coordinated clusters of mission activity."
				/>
			</div>

			<PlanetGraph data=data />
		</main>
	}
}

#[component]
fn Stat(value: usize, title: &'static str, blurb: &'static str) -> impl IntoView {
	view! {
		<div class="graph-stat">
			<p class="graph-stat-value">{value}</p>
			<p class="graph-stat-title">{title}</p>
			<p class="graph-stat-blurb">{blurb}</p>
		</div>
	}
}
