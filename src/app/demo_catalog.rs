//! Starter catalog written into an empty store on first launch.

use uiforge::{ComponentStore, NewComponent, StoreError, UserToken};

/// Owner recorded on catalog entries the studio ships with.
pub const CATALOG_OWNER: &str = "uiforge";

const BUTTON_SOURCE: &str = r#"import * as React from "react"
import { cn } from "@/lib/utils"

export function Button({ className, variant = "default", ...props }) {
  const variants = {
    default: "bg-primary text-primary-foreground hover:bg-primary/90",
    outline: "border border-input bg-background hover:bg-accent",
    destructive: "bg-destructive text-destructive-foreground",
  }
  return (
    <button
      className={cn("inline-flex h-9 items-center rounded-md px-4 text-sm font-medium", variants[variant], className)}
      {...props}
    />
  )
}
"#;

const BUTTON_USAGE: &str = r#"import { Button } from "@/components/ui/button"

export default function Preview() {
  return (
    <div className="flex gap-2 p-6">
      <Button>Continue</Button>
      <Button variant="outline">Cancel</Button>
      <Button variant="destructive">Delete</Button>
    </div>
  )
}
"#;

const CARD_SOURCE: &str = r#"import { Button } from "@/components/ui/button"

export function PricingCard({ plan = "Pro", price = "$12" }) {
  return (
    <div className="w-72 rounded-lg border bg-card p-6 text-card-foreground shadow-sm">
      <h3 className="text-lg font-semibold">{plan}</h3>
      <p className="mt-2 text-3xl font-bold">{price}<span className="text-sm text-muted-foreground">/mo</span></p>
      <Button className="mt-6 w-full">Choose {plan}</Button>
    </div>
  )
}
"#;

const CARD_USAGE: &str = r#"import { PricingCard } from "@/components/ui/pricing-card"

export default function Preview() {
  return (
    <div className="flex gap-4 p-6">
      <PricingCard plan="Starter" price="$0" />
      <PricingCard />
    </div>
  )
}
"#;

/// Creates the starter entries when the store has no catalog yet.
///
/// # Returns
/// The number of entries created (zero when a catalog already exists)
pub fn ensure_demo_catalog(store: &dyn ComponentStore) -> Result<usize, StoreError> {
    if !store.list_catalog()?.is_empty() {
        return Ok(0);
    }

    let owner = UserToken::new(CATALOG_OWNER);
    let entries = [
        NewComponent {
            name: "Button".to_string(),
            description: "Buttons in three variants".to_string(),
            catalog_id: Some("button".to_string()),
            source: BUTTON_SOURCE.to_string(),
            usage_source: BUTTON_USAGE.to_string(),
            category: Some("Inputs".to_string()),
            is_public: true,
            ..Default::default()
        },
        NewComponent {
            name: "Pricing Card".to_string(),
            description: "Plan card built on the catalog button".to_string(),
            catalog_id: Some("pricing-card".to_string()),
            source: CARD_SOURCE.to_string(),
            usage_source: CARD_USAGE.to_string(),
            registry_dependencies: Some(vec!["button".to_string()]),
            category: Some("Cards".to_string()),
            is_public: true,
            ..Default::default()
        },
    ];

    let count = entries.len();
    for entry in entries {
        store.create(&owner, entry)?;
    }
    log::info!("Seeded {} catalog entries", count);
    Ok(count)
}
