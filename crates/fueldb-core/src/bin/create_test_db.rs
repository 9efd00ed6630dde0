use fueldb_core::{Entity, FieldValues, FileStore, FuelType, Outlet, Purchase, Repository, Vehicle};

fn seed<E: Entity>(store: &FileStore, rows: &[&[(&str, &str)]]) -> fueldb_core::Result<()> {
    let mut repository = store.repository::<E>();
    for row in rows {
        let fields: FieldValues = row.iter().copied().collect();
        repository.create(&fields)?;
    }
    println!("Added {} {} rows", rows.len(), E::TYPE_NAME);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "test.db".to_string());
    let store = FileStore::create(&path)?;

    seed::<FuelType>(
        &store,
        &[
            &[("name", "Vortex 98"), ("vendor", "Shell"), ("ron", "98")],
            &[("name", "E10 Unleaded"), ("vendor", "Caltex"), ("ron", "91")],
            &[("name", "Synergy 8000"), ("vendor", "Mobil"), ("ron", "98")],
        ],
    )?;

    seed::<Outlet>(
        &store,
        &[
            &[("name", "Mobil Sydney"), ("location", "1 Main St")],
            &[("name", "Shell Hornsby"), ("location", "Hornsby")],
            &[("name", "Cherrybrook Caltex"), ("location", "Cherrybrook")],
            &[("name", "Newcastle Mobil"), ("location", "F3 Freeway")],
        ],
    )?;

    seed::<Vehicle>(
        &store,
        &[
            &[
                ("rego", "ABC-123"),
                ("year", "1991"),
                ("make", "Toyota"),
                ("model", "Corolla"),
                ("purchased", "2001-08-25"),
                ("initial_km", "85324"),
                ("odometer", "146814"),
            ],
            &[
                ("rego", "XYZ-987"),
                ("year", "2003"),
                ("make", "Toyota"),
                ("model", "Camry"),
                ("purchased", "2008-06-15"),
                ("initial_km", "15920"),
                ("odometer", "24921"),
            ],
            &[
                ("rego", "AB-12-CD"),
                ("year", "2009"),
                ("make", "Subaru"),
                ("model", "Liberty"),
                ("purchased", "2010-01-07"),
                ("initial_km", "0"),
                ("odometer", "915"),
            ],
        ],
    )?;

    let purchases: [(&str, &str, &str, &str, &str, &str, &str, &str); 10] = [
        ("2010-01-01 09:30:00", "ABC-123", "145675", "33.55", "124.9", "1", "", "true"),
        ("2010-01-03 13:00:00", "XYZ-987", "23987", "55.12", "119.9", "2", "3", "true"),
        ("2010-01-10 17:45:00", "ABC-123", "146017", "36.09", "127.9", "1", "2", "true"),
        ("2010-01-15 16:05:00", "AB-12-CD", "305", "13.28", "132.5", "3", "", "false"),
        ("2010-01-17 20:12:00", "AB-12-CD", "480", "46.71", "129.9", "1", "2", "true"),
        ("2010-01-25 17:35:00", "ABC-123", "146395", "30.67", "117.9", "1", "", "true"),
        ("2010-01-28 12:08:00", "XYZ-987", "24631", "54.87", "114.9", "2", "3", "true"),
        ("2010-02-02 10:51:00", "XYZ-987", "24921", "23.60", "111.5", "2", "3", "false"),
        ("2010-02-05 14:00:00", "AB-12-CD", "915", "48.17", "129.9", "3", "", "true"),
        ("2010-02-08 17:46:00", "ABC-123", "146814", "37.03", "136.5", "1", "", "true"),
    ];
    let mut repository = store.repository::<Purchase>();
    for (purchased, rego, odometer, quantity, price, fuel_type, outlet, filled) in purchases {
        let mut fields = FieldValues::from([
            ("purchased", purchased),
            ("vehicle_rego", rego),
            ("odometer", odometer),
            ("quantity", quantity),
            ("fuel_price", price),
            ("fuel_type_id", fuel_type),
            ("outlet_id", outlet),
            ("filled_tank", filled),
        ]);
        // The only discounted fill-up in the sample data.
        if odometer == "24921" {
            fields.insert("discount", "0.04");
        }
        repository.create(&fields)?;
    }
    println!("Added {} {} rows", purchases.len(), Purchase::TYPE_NAME);

    println!("Created {path}");
    Ok(())
}
