// Snapshot payloads sent to viewers
use crate::domain::time_series::ChartSample;
use crate::domain::widget::{Card, CardKind, Control, ControlKind};
use serde::Serialize;

/// On-demand view returned by `GET /api/data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullSnapshot {
    pub cards: Vec<FullCard>,
    pub controls: Vec<FullControl>,
    pub timestamp: u64,
    pub connected_clients: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub value: String,
    pub status: String,
    pub color: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: CardKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<Vec<ChartSample>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullControl {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ControlKind,
    pub state: bool,
    pub value: i32,
    pub color: String,
}

/// Push-channel view sent on tick, on change and on connect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactSnapshot {
    pub cards: Vec<CompactCard>,
    pub controls: Vec<CompactControl>,
    pub timestamp: u64,
    pub connected_clients: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactCard {
    pub id: String,
    pub value: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: CardKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<Vec<ChartSample>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactControl {
    pub id: String,
    pub state: bool,
    pub value: i32,
}

impl From<&Card> for FullCard {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id().to_string(),
            title: card.metadata.title.clone(),
            description: card.metadata.description.clone(),
            value: card.current_value(),
            status: card.current_status(),
            color: card.metadata.color.clone(),
            icon: card.metadata.icon.clone(),
            kind: card.kind(),
            chart_data: card.series().map(|s| s.samples()),
        }
    }
}

impl From<&Card> for CompactCard {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id().to_string(),
            value: card.current_value(),
            status: card.current_status(),
            kind: card.kind(),
            chart_data: card.series().map(|s| s.samples()),
        }
    }
}

impl From<&Control> for FullControl {
    fn from(control: &Control) -> Self {
        Self {
            id: control.id().to_string(),
            title: control.metadata.title.clone(),
            description: control.metadata.description.clone(),
            kind: control.kind(),
            state: control.state(),
            value: control.value(),
            color: control.metadata.color.clone(),
        }
    }
}

impl From<&Control> for CompactControl {
    fn from(control: &Control) -> Self {
        Self {
            id: control.id().to_string(),
            state: control.state(),
            value: control.value(),
        }
    }
}

impl FullSnapshot {
    /// Drop the presentation fields, keeping every shared field as is.
    pub fn to_compact(&self) -> CompactSnapshot {
        CompactSnapshot {
            cards: self
                .cards
                .iter()
                .map(|c| CompactCard {
                    id: c.id.clone(),
                    value: c.value.clone(),
                    status: c.status.clone(),
                    kind: c.kind,
                    chart_data: c.chart_data.clone(),
                })
                .collect(),
            controls: self
                .controls
                .iter()
                .map(|c| CompactControl {
                    id: c.id.clone(),
                    state: c.state,
                    value: c.value,
                })
                .collect(),
            timestamp: self.timestamp,
            connected_clients: self.connected_clients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_wire_shape() {
        let snapshot = CompactSnapshot {
            cards: vec![
                CompactCard {
                    id: "chart_0".to_string(),
                    value: "1.50".to_string(),
                    status: "Real-time data".to_string(),
                    kind: CardKind::Chart,
                    chart_data: Some(vec![ChartSample::new(1000, 1.5)]),
                },
                CompactCard {
                    id: "status_1".to_string(),
                    value: "Idle".to_string(),
                    status: "ok".to_string(),
                    kind: CardKind::Status,
                    chart_data: None,
                },
            ],
            controls: vec![CompactControl {
                id: "switch_0".to_string(),
                state: true,
                value: 0,
            }],
            timestamp: 1000,
            connected_clients: 2,
        };

        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({
                "cards": [
                    {
                        "id": "chart_0",
                        "value": "1.50",
                        "status": "Real-time data",
                        "type": 6,
                        "chartData": [{"timestamp": 1000, "value": 1.5}]
                    },
                    {"id": "status_1", "value": "Idle", "status": "ok", "type": 4}
                ],
                "controls": [{"id": "switch_0", "state": true, "value": 0}],
                "timestamp": 1000,
                "connectedClients": 2
            })
        );
    }
}
