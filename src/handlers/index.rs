//! Dashboard page handler.
//!
//! Serves the HTML page that charts the metrics stream. The page keeps a
//! rolling window of 20 points per series and evicts the oldest point from
//! the labels and all three datasets in lockstep; on a transport error it
//! only logs and lets EventSource reconnect on its own.

use axum::response::Html;
use tracing::{debug, instrument};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>System Metrics Dashboard</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        body {
            font-family: Arial, sans-serif;
            margin: 40px;
            text-align: center;
        }
        h1 {
            font-size: 48px;
        }
        canvas {
            max-width: 1200px;
            height: 600px !important;
            margin: 40px auto;
        }
    </style>
</head>
<body>
    <h1>System Metrics Dashboard</h1>
    <canvas id="metricsChart"></canvas>

    <script>
        const ctx = document.getElementById('metricsChart').getContext('2d');
        const chart = new Chart(ctx, {
            type: 'line',
            data: {
                labels: [],
                datasets: [
                    {
                        label: 'CPU Usage (%)',
                        data: [],
                        borderColor: 'rgba(75, 192, 192, 1)',
                        fill: false
                    },
                    {
                        label: 'Memory Usage (%)',
                        data: [],
                        borderColor: 'rgba(255, 99, 132, 1)',
                        fill: false
                    },
                    {
                        label: 'Disk Usage (%)',
                        data: [],
                        borderColor: 'rgba(54, 162, 235, 1)',
                        fill: false
                    }
                ]
            },
            options: {
                scales: {
                    y: {
                        beginAtZero: true,
                        max: 100,
                        title: { display: true, text: 'Percentage (%)', font: { size: 20 } },
                        ticks: { font: { size: 16 } }
                    },
                    x: {
                        title: { display: true, text: 'Time', font: { size: 20 } },
                        ticks: { font: { size: 16 } }
                    }
                },
                plugins: {
                    legend: { labels: { font: { size: 18 } } }
                }
            }
        });

        const maxPoints = 20;

        function updateChart(metrics) {
            chart.data.labels.push(metrics.timestamp);
            chart.data.datasets[0].data.push(metrics.cpu_percent);
            chart.data.datasets[1].data.push(metrics.memory_percent);
            chart.data.datasets[2].data.push(metrics.disk_usage);

            if (chart.data.labels.length > maxPoints) {
                chart.data.labels.shift();
                chart.data.datasets.forEach(dataset => dataset.data.shift());
            }
            chart.update();
        }

        const source = new EventSource('/metrics-stream');
        source.addEventListener('metrics', function(event) {
            updateChart(JSON.parse(event.data));
        });
        source.onerror = function() {
            console.log('metrics stream error, reconnecting...');
        };
    </script>
</body>
</html>
"#;

/// Handler for the / endpoint.
#[instrument]
pub async fn index_handler() -> Html<&'static str> {
    debug!("Processing / request");
    Html(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::DEFAULT_CHART_POINTS;

    #[test]
    fn page_window_matches_rust_contract() {
        assert!(INDEX_HTML.contains(&format!("const maxPoints = {DEFAULT_CHART_POINTS};")));
    }

    #[test]
    fn page_subscribes_to_the_stream_endpoint() {
        assert!(INDEX_HTML.contains("new EventSource('/metrics-stream')"));
        assert!(INDEX_HTML.contains("addEventListener('metrics'"));
    }

    #[test]
    fn page_charts_all_wire_fields() {
        for field in ["metrics.timestamp", "metrics.cpu_percent", "metrics.memory_percent", "metrics.disk_usage"] {
            assert!(INDEX_HTML.contains(field), "missing {field}");
        }
    }
}
