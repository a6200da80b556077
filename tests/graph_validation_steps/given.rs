//! Given steps for object-graph validation BDD scenarios.

use super::world::{GraphValidationWorld, aquarium};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use vauban::engine::ValidatorConfig;
use vauban::model::{BeanRef, Value};

#[given("the aquarium catalogue is registered")]
fn aquarium_catalogue(world: &mut GraphValidationWorld) -> Result<(), eyre::Report> {
    world.factory = Some(aquarium().wrap_err("build the aquarium validator factory")?);
    Ok(())
}

#[given("validators fail fast")]
fn validators_fail_fast(world: &mut GraphValidationWorld) {
    world.config = ValidatorConfig::fail_fast();
}

#[given("a pond holding an unnamed fish")]
fn pond_with_unnamed_fish(world: &mut GraphValidationWorld) {
    world.pond().set("fish", BeanRef::new("Fish"));
}

#[given("a pond with {count:usize} null labels")]
fn pond_with_null_labels(world: &mut GraphValidationWorld, count: usize) {
    world
        .pond()
        .set("labels", Value::list(std::iter::repeat_n(Value::Null, count)));
}

#[given("a pond with {count:usize} distinct blank badges and a gold one")]
fn pond_with_blank_badges(world: &mut GraphValidationWorld, count: usize) {
    let blanks = (1..=count).map(|width| Value::text(" ".repeat(width)));
    let badges = Value::set(blanks.chain(std::iter::once(Value::text("gold"))));
    world.pond().set("badges", badges);
}

#[given("a pond kept by two blank keepers referencing each other")]
fn pond_with_cyclic_keepers(world: &mut GraphValidationWorld) {
    let first = BeanRef::new("Keeper").with("name", " ");
    let second = BeanRef::new("Keeper").with("name", " ");
    first.set("partner", second.clone());
    second.set("partner", first.clone());
    world.pond().set("keeper", first);
}

#[given("a pond whose keeper and warden are the same blank keeper")]
fn pond_with_shared_keeper(world: &mut GraphValidationWorld) {
    let keeper = BeanRef::new("Keeper").with("name", " ");
    world.pond().set("keeper", keeper.clone());
    world.pond().set("warden", keeper);
}

#[given("an unlicensed kennel with capacity {capacity:i64}")]
fn unlicensed_kennel(world: &mut GraphValidationWorld, capacity: i64) {
    world.kennel = Some(BeanRef::new("Kennel").with("capacity", capacity));
}

#[given(r#"a kennel licensed as "{licence}" with capacity {capacity:i64}"#)]
fn licensed_kennel(world: &mut GraphValidationWorld, licence: String, capacity: i64) {
    world.kennel = Some(
        BeanRef::new("Kennel")
            .with("licence", licence)
            .with("capacity", capacity),
    );
}
