use fleet_types::{FleetError, Shipment};

/// Check every field-level invariant of a shipment about to be stored.
pub fn validate_shipment(shipment: &Shipment) -> Result<(), FleetError> {
    for (field, value) in [
        ("shipmentNumber", &shipment.shipment_number),
        ("origin", &shipment.origin),
        ("destination", &shipment.destination),
        ("carrier", &shipment.carrier),
        ("currentLocation", &shipment.current_location),
        ("hazardClass", &shipment.hazard_class),
    ] {
        if value.trim().is_empty() {
            return Err(FleetError::invalid(format!("{field} must not be empty")));
        }
    }
    if shipment.estimated_arrival < shipment.departure_date {
        return Err(FleetError::invalid(
            "estimatedArrival must not precede departureDate",
        ));
    }
    Ok(())
}
