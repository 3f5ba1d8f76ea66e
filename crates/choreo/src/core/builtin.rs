//! Stock presentation: a building-supplies network walking through three
//! logistics decisions, each shown first done badly and then done well.

use super::{AudioCue, ControlRef, Cue, Entity, EntityKind, Overlay, Point, Polarity, Scenario, SceneScript};
use chrono::NaiveTime;

const GISORS: Point = Point::new(120.0, 140.0);
const MERU: Point = Point::new(420.0, 300.0);
const BEAUVAIS: Point = Point::new(260.0, 40.0);
const SITE: Point = Point::new(520.0, 420.0);

pub const OBJ_CONSOLIDATE: &str = "consolidate_orders";
pub const OBJ_CONTINGENCY: &str = "activate_contingency";
pub const OBJ_REASSURE: &str = "reassure_customer";

fn at(hour: u32, minute: u32) -> NaiveTime {
	NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn truck(id: &str, position: Point, label: &str) -> Entity {
	Entity::new(id, EntityKind::Vehicle, position, "slate").with_label(label)
}

fn parcel(id: &str, position: Point, label: &str) -> Entity {
	Entity::new(id, EntityKind::Parcel, position, "amber").with_label(label)
}

fn problem(body: &str) -> Cue {
	Cue::ShowOverlay {
		overlay: Overlay::new("THE PROBLEM", body, Polarity::Adverse),
	}
}

fn card(title: &str, body: &str, why: &str, impact: &str, polarity: Polarity) -> Cue {
	Cue::ShowOverlay {
		overlay: Overlay::new(title, body, polarity).with_why(why).with_impact(impact),
	}
}

fn log(text: &str, polarity: Polarity, impact: &str) -> Cue {
	Cue::Log {
		text: text.to_string(),
		polarity,
		impact_label: impact.to_string(),
		flagged: polarity == Polarity::Adverse,
	}
}

fn click(control: ControlRef) -> Cue {
	Cue::Click { control }
}

fn moved(entity: Entity, travel_ms: i64) -> Cue {
	Cue::MoveEntity {
		entity: entity.travelling(travel_ms),
	}
}

fn intro() -> SceneScript {
	SceneScript::new("Strategic & financial impact simulation")
		.then_after(2000, click(ControlRef::Start))
		.then(Cue::Advance)
}

fn consolidation() -> SceneScript {
	SceneScript::new("Gisors-Méru consolidation")
		.then(Cue::SetClock {
			start: Some(at(14, 0)),
			target: at(16, 0),
			label: "Supplier order cutoff".to_string(),
		})
		.then(Cue::SeedEntities {
			entities: vec![
				truck("truck-gisors", GISORS, "Gisors"),
				truck("truck-meru", MERU, "Méru"),
				parcel("tiles", BEAUVAIS, "Tiles"),
				parcel("cement", BEAUVAIS, "Cement"),
			],
		})
		.then(problem("Gisors and Méru order separately from the same supplier."))
		.then_after(3000, Cue::DismissOverlay)
		.then(click(ControlRef::BadChoice))
		.then(moved(truck("truck-gisors", BEAUVAIS, "Gisors"), 1500))
		.then(moved(truck("truck-meru", BEAUVAIS, "Méru"), 1500))
		.then(Cue::AddMetrics {
			avoided_loss: 180,
			realized_gain: 0,
		})
		.then(log("Two separate orders sent to Beauvais", Polarity::Adverse, "-180 €"))
		.then(card(
			"DOUBLE BILLING",
			"Two trucks paid for nothing. Waste: 180 €.",
			"Each branch books its own freight for the same supplier.",
			"-180 €",
			Polarity::Adverse,
		))
		.then_after(3000, Cue::DismissOverlay)
		.then(Cue::SetStep { step: 1 })
		.then_after(1000, click(ControlRef::GoodChoice))
		.then(moved(truck("truck-gisors", GISORS, "Gisors"), 1500))
		.then(moved(truck("truck-meru", BEAUVAIS, "Méru (grouped)"), 1500))
		.then(moved(truck("shuttle", MERU, "Internal shuttle"), 0))
		.then(Cue::AddMetrics {
			avoided_loss: 0,
			realized_gain: 90,
		})
		.then(log("D-1 consolidation: single delivery to Méru + internal shuttle", Polarity::Favorable, "+90 €"))
		.then(Cue::CompleteObjective {
			key: OBJ_CONSOLIDATE.to_string(),
		})
		.then(card(
			"HUB SOLUTION",
			"D-1 consolidation. Single delivery to Méru + internal shuttle.",
			"Orders to the same supplier are grouped the day before.",
			"+90 €",
			Polarity::Favorable,
		))
		.then_after(3500, Cue::DismissOverlay)
		.then(Cue::Advance)
}

fn late_truck() -> SceneScript {
	SceneScript::new("15:30 protocol")
		.then(Cue::SetClock {
			start: Some(at(15, 0)),
			target: at(15, 30),
			label: "Carrier check-in".to_string(),
		})
		.then(Cue::SeedEntities {
			entities: vec![truck("carrier", BEAUVAIS, "Carrier"), parcel("order-402", BEAUVAIS, "Order #402")],
		})
		.then(problem("The truck is not there at 15:30. Nobody knows anything."))
		.then_after(3000, Cue::DismissOverlay)
		.then(click(ControlRef::BadChoice))
		.then(Cue::AddMetrics {
			avoided_loss: 2000,
			realized_gain: 0,
		})
		.then(log("Waited for the carrier without news", Polarity::Adverse, "-2 000 €"))
		.then(card(
			"CUSTOMER LOST",
			"The customer discovers the delay tomorrow morning. Site stopped.",
			"Nobody checks the carrier before the end of the day.",
			"-2 000 €",
			Polarity::Adverse,
		))
		.then_after(3000, Cue::DismissOverlay)
		.then(Cue::SetStep { step: 1 })
		.then_after(1000, click(ControlRef::GoodChoice))
		.then(moved(truck("parcel-taxi", BEAUVAIS, "Parcel taxi"), 0))
		.then(moved(truck("parcel-taxi", SITE, "Parcel taxi"), 2000))
		.then(moved(parcel("order-402", SITE, "Order #402"), 2000))
		.then(Cue::AddMetrics {
			avoided_loss: 0,
			realized_gain: 500,
		})
		.then(log("15:30 alert raised, parcel taxi dispatched, customer called at 16:00", Polarity::Favorable, "+500 €"))
		.then(Cue::CompleteObjective {
			key: OBJ_CONTINGENCY.to_string(),
		})
		.then(card(
			"15:30 PROTOCOL",
			"Immediate alert. Parcel taxi activated. Customer informed at 16:00.",
			"A fixed checkpoint turns silence into a decision.",
			"+500 €",
			Polarity::Favorable,
		))
		.then_after(3500, Cue::DismissOverlay)
		.then(Cue::Advance)
}

fn customer_messaging() -> SceneScript {
	SceneScript::new("Customer interface")
		.then(Cue::SetClock {
			start: Some(at(16, 45)),
			target: at(17, 15),
			label: "Customer callback window".to_string(),
		})
		.then(Cue::SeedEntities {
			entities: vec![parcel("order-402", SITE, "Order #402")],
		})
		.then(problem("Impersonal SMS sent at 17:00. No reply."))
		.then_after(3000, Cue::DismissOverlay)
		.then(click(ControlRef::BadChoice))
		.then(Cue::OpenChat { title: "Messages".to_string() })
		.then(Cue::PostMessage {
			author: "GEDIMAT".to_string(),
			text: "Your delivery is scheduled for tomorrow during the day.".to_string(),
			is_self: true,
		})
		.then(log("Standard SMS, customer calls the sales rep back", Polarity::Adverse, "Trust at risk"))
		.then(card(
			"COLD COMMUNICATION",
			"The customer is not reassured. They call the sales rep back.",
			"A generic text at 17:00 answers none of their questions.",
			"Trust at risk",
			Polarity::Adverse,
		))
		.then_after(4000, Cue::DismissOverlay)
		.then(Cue::SetStep { step: 1 })
		.then_after(1000, click(ControlRef::GoodChoice))
		.then(Cue::OpenChat { title: "Site DUPONT".to_string() })
		.then(Cue::TypeMessage {
			author: "Sophie (Logistics)".to_string(),
			text: "Order #402 loaded. Arrival tomorrow 10:00.".to_string(),
			is_self: true,
		})
		.then(Cue::PostMessage {
			author: "Sophie (Logistics)".to_string(),
			text: "[Photo: loaded pallets]".to_string(),
			is_self: true,
		})
		.then(Cue::AddMetrics {
			avoided_loss: 0,
			realized_gain: 1200,
		})
		.then(log("Site WhatsApp group, photo of the loaded order sent", Polarity::Favorable, "+1 200 €"))
		.then(Cue::CompleteObjective {
			key: OBJ_REASSURE.to_string(),
		})
		.then(card(
			"CONCIERGE EFFECT",
			"Site group chat. Photo sent. Full confidence.",
			"A named person and a photo beat a generic notice.",
			"+1 200 €",
			Polarity::Favorable,
		))
		.then_after(5000, Cue::DismissOverlay)
		.then(Cue::Advance)
}

fn summary() -> SceneScript {
	SceneScript::new("Demonstration complete").then(Cue::Sound { sound: AudioCue::Success })
}

pub fn scenario() -> Scenario {
	Scenario {
		intro: intro(),
		scenes: vec![consolidation(), late_truck(), customer_messaging()],
		summary: summary(),
		objectives: vec![OBJ_CONSOLIDATE.to_string(), OBJ_CONTINGENCY.to_string(), OBJ_REASSURE.to_string()],
	}
}
