use axum::{
    http::header,
    response::{Html, IntoResponse},
};

pub async fn dashboard() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Html(DASHBOARD_HTML),
    )
}

// The page only draws what the API describes: tile text, alert state and
// chart configurations all come from /api. A chart is redrawn only when its
// revision changes, and always destroyed before being recreated.
const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Frog Pit Sensors</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
    <style>
        :root {
            --bg: #15171c;
            --surface: #1f232b;
            --border: #2d323c;
            --text: #eeeeee;
            --muted: #aaaaaa;
            --good: #22c55e;
            --bad: #ef4444;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); padding: 1.5rem; }
        h1 { font-size: 1.25rem; font-weight: 600; margin-bottom: 1rem; }

        #sensor-grid {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(260px, 1fr));
            gap: 1rem;
        }
        .tile {
            position: relative;
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 1rem;
            cursor: pointer;
        }
        .tile.placeholder { cursor: default; opacity: 0.6; }
        .tile h2 { font-size: 1rem; margin-bottom: 0.5rem; padding-right: 1.5rem; }
        .tile canvas { height: 120px !important; }
        .alert-icon { position: absolute; top: 0.75rem; right: 1rem; font-size: 1.25rem; color: var(--muted); }
        .alert-icon.good { color: var(--good); }
        .alert-icon.bad { color: var(--bad); }
        .reading { font-size: 0.9rem; margin-bottom: 0.5rem; }
        .reading.out-of-range { color: #f59e0b; }
        .offline { color: var(--bad); }
        .last-update { font-size: 0.75rem; color: var(--muted); margin-top: 0.5rem; }

        #popup {
            display: none;
            position: fixed;
            inset: 0;
            background: rgba(0, 0, 0, 0.7);
            align-items: center;
            justify-content: center;
        }
        .popup-body {
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 1.25rem;
            width: min(960px, 95vw);
            height: min(600px, 90vh);
            display: flex;
            flex-direction: column;
            gap: 0.75rem;
        }
        .popup-controls { display: flex; gap: 0.5rem; align-items: center; flex-wrap: wrap; }
        .popup-controls button, .popup-controls select {
            background: var(--bg);
            color: var(--text);
            border: 1px solid var(--border);
            border-radius: 0.375rem;
            padding: 0.35rem 0.75rem;
            cursor: pointer;
        }
        .popup-controls button.active { border-color: var(--good); }
        .popup-controls .close { margin-left: auto; }
        .popup-chart { flex: 1; position: relative; }
        .popup-status { font-size: 0.75rem; color: var(--muted); }
    </style>
</head>
<body>
    <h1>Frog Pit Sensors</h1>
    <div id="sensor-grid"></div>

    <div id="popup">
        <div class="popup-body">
            <div class="popup-controls">
                <strong id="popup-title">Sensor Graph</strong>
                <button data-scale="hour">Hour</button>
                <button data-scale="day">Day</button>
                <button data-scale="week">Week</button>
                <button data-scale="month">Month</button>
                <select id="filter-select">
                    <option value="all">All hours</option>
                    <option value="day">Day (7am-7pm)</option>
                    <option value="night">Night</option>
                </select>
                <button class="close" id="popup-close">Close</button>
            </div>
            <div class="popup-chart"><canvas id="popup-chart"></canvas></div>
            <div class="popup-status" id="popup-status"></div>
        </div>
    </div>

    <script>
        const REFRESH_MS = 15000;
        const grid = document.getElementById("sensor-grid");
        const tileCharts = {};
        let popup = null;
        let popupChart = null;

        function toChartJs(config) {
            return {
                type: config.kind,
                data: {
                    labels: config.labels,
                    datasets: config.datasets.map(d => ({
                        label: d.label,
                        data: d.data,
                        borderColor: d.borderColor,
                        fill: d.fill,
                        borderDash: d.borderDash || [],
                        spanGaps: false
                    }))
                },
                options: {
                    responsive: true,
                    maintainAspectRatio: false,
                    animation: false,
                    plugins: { legend: { display: config.options.legend, labels: { color: "#eee" } } },
                    scales: {
                        x: { ticks: { color: "#aaa" } },
                        y: {
                            ticks: { color: "#eee" },
                            ...(config.options.yAxis.min !== undefined ? { min: config.options.yAxis.min } : {}),
                            ...(config.options.yAxis.max !== undefined ? { max: config.options.yAxis.max } : {}),
                            ...(config.options.yAxis.title
                                ? { title: { display: true, text: config.options.yAxis.title, color: "#eee" } }
                                : {})
                        }
                    }
                }
            };
        }

        function buildTile(tile) {
            const el = document.createElement("div");
            el.className = tile.placeholder ? "tile placeholder" : "tile";
            el.dataset.sensorId = tile.sensor_id;

            const alert = document.createElement("span");
            alert.className = "alert-icon";
            alert.textContent = "•";

            const title = document.createElement("h2");
            title.textContent = tile.label;

            const reading = document.createElement("div");
            reading.className = "reading";

            const canvas = document.createElement("canvas");

            const last = document.createElement("div");
            last.className = "last-update";

            el.append(alert, title, reading, canvas, last);
            if (!tile.placeholder) {
                el.addEventListener("click", () => openPopup(tile.sensor_id));
            }
            grid.appendChild(el);
            return { el, alert, reading, canvas, last };
        }

        function renderTile(tile) {
            let entry = tileCharts[tile.sensor_id];
            if (!entry) {
                entry = tileCharts[tile.sensor_id] = { dom: buildTile(tile), chart: null, revision: 0 };
            }
            const dom = entry.dom;

            dom.alert.className = "alert-icon" + (tile.alert === "unknown" ? "" : " " + tile.alert);
            if (tile.alert !== "unknown") dom.alert.textContent = "●";

            dom.reading.textContent = tile.reading;
            dom.reading.classList.toggle("offline", tile.alert === "bad");
            dom.reading.classList.toggle("out-of-range", tile.in_range === false);
            dom.last.textContent = tile.last_updated || "";

            if (tile.chart && tile.chart.revision !== entry.revision) {
                if (entry.chart) entry.chart.destroy();
                entry.chart = new Chart(dom.canvas.getContext("2d"), toChartJs(tile.chart.config));
                entry.revision = tile.chart.revision;
            }
        }

        async function refreshTiles() {
            try {
                const res = await fetch("api/tiles");
                if (!res.ok) throw new Error("HTTP " + res.status);
                (await res.json()).forEach(renderTile);
            } catch (err) {
                console.error("Failed to refresh tiles:", err);
            }
        }

        function drawPopup(view) {
            popup = view;
            if (popupChart) popupChart.destroy();
            popupChart = new Chart(document.getElementById("popup-chart").getContext("2d"), toChartJs(view.chart.config));
            document.querySelectorAll("[data-scale]").forEach(b => b.classList.toggle("active", b.dataset.scale === view.scale));
            document.getElementById("filter-select").value = view.filter;
            document.getElementById("popup-status").textContent = view.points + " points";
        }

        async function popupRequest(url, method, body) {
            const res = await fetch(url, {
                method,
                headers: { "Content-Type": "application/json" },
                body: JSON.stringify(body)
            });
            if (res.status === 409) return null; // a newer request owns the chart
            if (!res.ok) {
                const err = await res.json().catch(() => ({}));
                document.getElementById("popup-status").textContent = err.error || ("HTTP " + res.status);
                return null;
            }
            return res.json();
        }

        async function openPopup(sensorId) {
            if (popup) closePopup();
            document.getElementById("popup").style.display = "flex";
            document.getElementById("popup-title").textContent = tileCharts[sensorId].dom.el.querySelector("h2").textContent;
            document.getElementById("popup-status").textContent = "Loading...";
            const view = await popupRequest("api/popups", "POST", { sensor_id: sensorId });
            if (view) drawPopup(view);
        }

        async function updatePopup(change) {
            if (!popup) return;
            const view = await popupRequest("api/popups/" + popup.session_id, "PATCH", change);
            if (view && popup && view.session_id === popup.session_id) drawPopup(view);
        }

        function closePopup() {
            document.getElementById("popup").style.display = "none";
            if (popupChart) popupChart.destroy();
            popupChart = null;
            if (popup) fetch("api/popups/" + popup.session_id, { method: "DELETE" });
            popup = null;
        }

        document.querySelectorAll("[data-scale]").forEach(b =>
            b.addEventListener("click", () => updatePopup({ scale: b.dataset.scale })));
        document.getElementById("filter-select").addEventListener("change", e =>
            updatePopup({ filter: e.target.value }));
        document.getElementById("popup-close").addEventListener("click", closePopup);

        refreshTiles();
        setInterval(refreshTiles, REFRESH_MS);
    </script>
</body>
</html>
"##;
