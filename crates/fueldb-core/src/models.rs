//! The fuel log schema: fuel types, outlets, vehicles and purchases.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::binding::BindingTable;
use crate::entity::{Entity, RecordId};
use crate::error::Result;
use crate::field::Field;
use crate::field_table;
use crate::layout::{line_edit_layout, DialogLayout, EntityDialog};
use crate::widget::Form;

/// Tables present in every store.
pub const TABLES: [&str; 4] = [FuelType::TABLE, Outlet::TABLE, Vehicle::TABLE, Purchase::TABLE];

/// One particular brand of fuel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelType {
    pub name: String,
    pub vendor: String,
    pub ron: String,
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, RON {})", self.name, self.vendor, self.ron)
    }
}

impl Entity for FuelType {
    const TYPE_NAME: &'static str = "FuelType";
    const TABLE: &'static str = "fueltype";

    fn fields() -> &'static [Field<Self>] {
        static FIELDS: &[Field<FuelType>] = field_table!(FuelType { name, vendor, ron });
        FIELDS
    }
}

impl EntityDialog for FuelType {
    fn layout() -> Result<DialogLayout<Self>> {
        line_edit_layout(&[
            ("name_line_edit", "Name", "name"),
            ("vendor_line_edit", "Vendor", "vendor"),
            ("ron_line_edit", "RON", "ron"),
        ])
    }
}

/// A fuel outlet where fuel was purchased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlet {
    pub name: String,
    pub location: String,
}

impl fmt::Display for Outlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.location)
        }
    }
}

impl Entity for Outlet {
    const TYPE_NAME: &'static str = "Outlet";
    const TABLE: &'static str = "outlet";

    fn fields() -> &'static [Field<Self>] {
        static FIELDS: &[Field<Outlet>] = field_table!(Outlet { name, location });
        FIELDS
    }
}

impl EntityDialog for Outlet {
    fn layout() -> Result<DialogLayout<Self>> {
        line_edit_layout(&[
            ("name_line_edit", "Name", "name"),
            ("location_line_edit", "Location", "location"),
        ])
    }
}

/// A vehicle, keyed by its registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub rego: String,
    pub year: String,
    pub make: String,
    pub model: String,
    pub series: String,
    pub body: String,
    pub colour: String,
    pub transmission: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub owner: String,
    pub manufactured: Option<NaiveDate>,
    pub purchased: Option<NaiveDate>,
    pub initial_km: Option<Decimal>,
    pub odometer: Option<Decimal>,
    pub notes: String,
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.rego, self.year, self.make, self.model)
    }
}

impl Entity for Vehicle {
    const TYPE_NAME: &'static str = "Vehicle";
    const TABLE: &'static str = "vehicle";

    fn fields() -> &'static [Field<Self>] {
        static FIELDS: &[Field<Vehicle>] = field_table!(Vehicle {
            rego,
            year,
            make,
            model,
            series,
            body,
            colour,
            transmission,
            vehicle_type,
            owner,
            manufactured,
            purchased,
            initial_km,
            odometer,
            notes,
        });
        FIELDS
    }

    fn natural_key(&self) -> Option<RecordId> {
        Some(RecordId::new(self.rego.clone()))
    }
}

impl EntityDialog for Vehicle {
    fn layout() -> Result<DialogLayout<Self>> {
        line_edit_layout(&[
            ("rego_line_edit", "Registration", "rego"),
            ("year_line_edit", "Year", "year"),
            ("make_line_edit", "Make", "make"),
            ("model_line_edit", "Model", "model"),
            ("series_line_edit", "Series", "series"),
            ("body_line_edit", "Body", "body"),
            ("colour_line_edit", "Colour", "colour"),
            ("transmission_line_edit", "Transmission", "transmission"),
            ("type_line_edit", "Type", "vehicle_type"),
            ("owner_line_edit", "Owner", "owner"),
            ("manufactured_line_edit", "Manufactured (YYYY-MM-DD)", "manufactured"),
            ("purchased_line_edit", "Purchased (YYYY-MM-DD)", "purchased"),
            ("initial_km_line_edit", "Initial km", "initial_km"),
            ("odometer_line_edit", "Odometer", "odometer"),
            ("notes_line_edit", "Notes", "notes"),
        ])
    }
}

/// One fuel purchase for a vehicle.
///
/// Keyed by vehicle and odometer reading: a vehicle cannot be filled twice
/// at the same reading. The reading is normalized in the key, so `146814`
/// and `146814.0` are the same fill-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub purchased: Option<NaiveDateTime>,
    pub vehicle_rego: String,
    pub odometer: Decimal,
    pub quantity: Option<Decimal>,
    pub fuel_price: Option<Decimal>,
    pub fuel_type_id: Option<i64>,
    pub filled_tank: bool,
    pub outlet_id: Option<i64>,
    pub discount: Option<Decimal>,
    pub est_eff: Option<Decimal>,
    pub driving_notes: String,
}

impl fmt::Display for Purchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} km", self.vehicle_rego, self.odometer)?;
        if let Some(purchased) = self.purchased {
            write!(f, " on {}", purchased.format("%Y-%m-%d %H:%M"))?;
        }
        if let Some(quantity) = self.quantity {
            write!(f, ", {quantity} L")?;
        }
        if self.filled_tank {
            write!(f, " (filled)")?;
        }
        Ok(())
    }
}

impl Entity for Purchase {
    const TYPE_NAME: &'static str = "Purchase";
    const TABLE: &'static str = "purchase";

    fn fields() -> &'static [Field<Self>] {
        static FIELDS: &[Field<Purchase>] = field_table!(Purchase {
            purchased,
            vehicle_rego,
            odometer,
            quantity,
            fuel_price,
            fuel_type_id,
            filled_tank,
            outlet_id,
            discount,
            est_eff,
            driving_notes,
        });
        FIELDS
    }

    fn natural_key(&self) -> Option<RecordId> {
        Some(RecordId::new(format!(
            "{}@{}",
            self.vehicle_rego,
            self.odometer.normalize()
        )))
    }
}

impl EntityDialog for Purchase {
    fn layout() -> Result<DialogLayout<Self>> {
        let form = Form::new()
            .with_line_edit("purchased_line_edit", "Purchased (YYYY-MM-DD HH:MM:SS)")
            .with_line_edit("vehicle_line_edit", "Vehicle rego")
            .with_line_edit("odometer_line_edit", "Odometer")
            .with_line_edit("quantity_line_edit", "Quantity (L)")
            .with_line_edit("fuel_price_line_edit", "Price (c/L)")
            .with_line_edit("fuel_type_line_edit", "Fuel type id")
            .with_check_box("filled_tank_check_box", "Filled tank")
            .with_line_edit("outlet_line_edit", "Outlet id")
            .with_line_edit("discount_line_edit", "Discount")
            .with_line_edit("est_eff_line_edit", "Est. efficiency")
            .with_line_edit("driving_notes_line_edit", "Driving notes");
        let bindings = BindingTable::new([
            ("purchased_line_edit", "purchased"),
            ("vehicle_line_edit", "vehicle_rego"),
            ("odometer_line_edit", "odometer"),
            ("quantity_line_edit", "quantity"),
            ("fuel_price_line_edit", "fuel_price"),
            ("fuel_type_line_edit", "fuel_type_id"),
            ("filled_tank_check_box", "filled_tank"),
            ("outlet_line_edit", "outlet_id"),
            ("discount_line_edit", "discount"),
            ("est_eff_line_edit", "est_eff"),
            ("driving_notes_line_edit", "driving_notes"),
        ])?;
        Ok(DialogLayout { form, bindings })
    }
}
