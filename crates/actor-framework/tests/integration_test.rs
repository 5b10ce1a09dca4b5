use actor_framework::{ActorEntity, FrameworkError, ResourceActor};
use async_trait::async_trait;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Bin {
    id: u32,
    label: String,
    units: u32,
}

#[derive(Debug)]
struct BinCreate {
    label: String,
    units: u32,
}

#[derive(Debug)]
struct BinUpdate {
    label: Option<String>,
}

#[derive(Debug)]
enum BinAction {
    Take(u32),
    Put(u32),
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum BinError {
    #[error("only {available} units left")]
    Short { available: u32 },
    #[error("label must not be empty")]
    EmptyLabel,
}

#[async_trait]
impl ActorEntity for Bin {
    type Id = u32;
    type Create = BinCreate;
    type Update = BinUpdate;
    type Action = BinAction;
    type ActionResult = u32;
    type Context = ();
    type Error = BinError;

    fn from_create_params(id: u32, params: BinCreate) -> Result<Self, Self::Error> {
        if params.label.is_empty() {
            return Err(BinError::EmptyLabel);
        }
        Ok(Self {
            id,
            label: params.label,
            units: params.units,
        })
    }

    async fn on_update(&mut self, update: BinUpdate, _ctx: &Self::Context) -> Result<(), Self::Error> {
        if let Some(label) = update.label {
            self.label = label;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: BinAction, _ctx: &Self::Context) -> Result<u32, Self::Error> {
        match action {
            BinAction::Take(n) if n > self.units => Err(BinError::Short {
                available: self.units,
            }),
            BinAction::Take(n) => {
                self.units -= n;
                Ok(self.units)
            }
            BinAction::Put(n) => {
                self.units += n;
                Ok(self.units)
            }
        }
    }
}

fn bin(label: &str, units: u32) -> BinCreate {
    BinCreate {
        label: label.into(),
        units,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::new(10);
    tokio::spawn(actor.run(()));

    let id: u32 = client.create(bin("bolts", 5)).await.unwrap();
    assert_eq!(id, 1);

    let left = client.perform_action(id, BinAction::Take(3)).await.unwrap();
    assert_eq!(left, 2);

    let updated: Bin = client
        .update(id, BinUpdate { label: Some("nuts".into()) })
        .await
        .unwrap();
    assert_eq!(updated.label, "nuts");
    assert_eq!(updated.units, 2);

    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_many_skips_unknown_ids_and_keeps_order() {
    let (actor, client) = ResourceActor::<Bin>::new(10);
    tokio::spawn(actor.run(()));

    let a = client.create(bin("a", 1)).await.unwrap();
    let b = client.create(bin("b", 2)).await.unwrap();

    let found = client.get_many(vec![b, 42, a]).await.unwrap();
    let labels: Vec<&str> = found.iter().map(|item| item.label.as_str()).collect();
    assert_eq!(labels, vec!["b", "a"]);
}

#[tokio::test]
async fn test_failed_action_surfaces_typed_entity_error() {
    let (actor, client) = ResourceActor::<Bin>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(bin("washers", 2)).await.unwrap();
    let err = client
        .perform_action(id, BinAction::Take(5))
        .await
        .unwrap_err();

    assert_eq!(
        err.entity_error::<BinError>(),
        Some(&BinError::Short { available: 2 })
    );
    let item = client.get(id).await.unwrap().unwrap();
    assert_eq!(item.units, 2);
}

#[tokio::test]
async fn test_rejected_create_is_not_stored() {
    let (actor, client) = ResourceActor::<Bin>::new(10);
    tokio::spawn(actor.run(()));

    let err = client.create(bin("", 1)).await.unwrap_err();
    assert_eq!(err.entity_error::<BinError>(), Some(&BinError::EmptyLabel));

    let missing = client.perform_action(1, BinAction::Put(1)).await.unwrap_err();
    assert!(matches!(missing, FrameworkError::NotFound(_)));
}

#[tokio::test]
async fn test_concurrent_takes_never_underflow() {
    let (actor, client) = ResourceActor::<Bin>::new(64);
    tokio::spawn(actor.run(()));
    let id = client.create(bin("pins", 10)).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.perform_action(id, BinAction::Take(3)).await
        }));
    }

    let mut granted = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            granted += 1;
        }
    }

    assert_eq!(granted, 3);
    assert_eq!(client.get(id).await.unwrap().unwrap().units, 1);
}
