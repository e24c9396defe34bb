//! Explicit widget handle replacing the process-wide `init`/`destroy` global.
//!
//! A [`MeAgent`] starts idle. `init` makes it ready; `destroy` releases every
//! mounted node and listener and returns it to idle. `destroy` is idempotent
//! and safe on a handle that was never initialized.

use std::collections::HashMap;

use shared::protocol::{Catalog, OfferDetail, RewardBalance, SwapAmountResponse};
use tracing::{debug, info};

use crate::{
    catalog::{check_catalog, CatalogSource},
    config::MeAgentConfig,
    controller::{FlowCallbacks, FlowRender, FlowState, RedemptionFlowController},
    element::{Control, Element, NodeId},
    error::AgentError,
    views::{
        BrandListView, CategoryListView, OfferLinks, OfferListView, OfferPreviewCard,
        ProductListView,
    },
};

enum Mounted {
    Redemption(FlowRender),
    OfferPreview(Element),
}

impl Mounted {
    fn element(&self) -> &Element {
        match self {
            Self::Redemption(render) => &render.element,
            Self::OfferPreview(element) => element,
        }
    }

    fn element_mut(&mut self) -> &mut Element {
        match self {
            Self::Redemption(render) => &mut render.element,
            Self::OfferPreview(element) => element,
        }
    }
}

struct Session {
    config: MeAgentConfig,
    catalog: Catalog,
    links: OfferLinks,
    mounted: HashMap<NodeId, Mounted>,
}

impl Session {
    fn mounted(&self, node: NodeId) -> Result<&Mounted, AgentError> {
        self.mounted.get(&node).ok_or(AgentError::UnknownNode(node))
    }

    fn mounted_mut(&mut self, node: NodeId) -> Result<&mut Mounted, AgentError> {
        self.mounted
            .get_mut(&node)
            .ok_or(AgentError::UnknownNode(node))
    }
}

#[derive(Default)]
pub struct MeAgent {
    session: Option<Session>,
}

impl MeAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for `new` followed by `init`.
    pub async fn start(
        config: MeAgentConfig,
        source: &dyn CatalogSource,
    ) -> Result<Self, AgentError> {
        let mut agent = Self::new();
        agent.init(config, source).await?;
        Ok(agent)
    }

    pub async fn init(
        &mut self,
        config: MeAgentConfig,
        source: &dyn CatalogSource,
    ) -> Result<(), AgentError> {
        if self.session.is_some() {
            return Err(AgentError::AlreadyInitialized);
        }
        config.validate()?;
        let links = config.offer_links()?;
        let catalog = source
            .load_catalog(&config)
            .await
            .map_err(AgentError::Catalog)?;
        check_catalog(&catalog).map_err(AgentError::Catalog)?;

        info!(
            partner_id = %config.partner_id,
            environment = config.environment.as_str(),
            network = config.network.as_str(),
            brands = catalog.brands.len(),
            offers = catalog.offers.len(),
            "me-agent initialized"
        );
        self.session = Some(Session {
            config,
            catalog,
            links,
            mounted: HashMap::new(),
        });
        Ok(())
    }

    pub fn destroy(&mut self) {
        let Some(mut session) = self.session.take() else {
            debug!("destroy called on idle me-agent");
            return;
        };
        let nodes = session.mounted.len();
        for mounted in session.mounted.values_mut() {
            mounted.element_mut().detach_all();
        }
        session.mounted.clear();
        info!(nodes, "me-agent destroyed");
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    fn session(&self) -> Result<&Session, AgentError> {
        self.session.as_ref().ok_or(AgentError::NotInitialized)
    }

    fn session_mut(&mut self) -> Result<&mut Session, AgentError> {
        self.session.as_mut().ok_or(AgentError::NotInitialized)
    }

    pub fn config(&self) -> Result<&MeAgentConfig, AgentError> {
        Ok(&self.session()?.config)
    }

    pub fn catalog(&self) -> Result<&Catalog, AgentError> {
        Ok(&self.session()?.catalog)
    }

    /// Opens a redemption flow and mounts its node. Listeners are bound
    /// separately with [`MeAgent::attach_redemption`]. At most one flow is
    /// mounted: a successful open detaches and drops the previous one.
    pub fn open_redemption(
        &mut self,
        reward: &RewardBalance,
        swap_amount: &SwapAmountResponse,
        offer_detail: Option<&OfferDetail>,
    ) -> Result<NodeId, AgentError> {
        let session = self.session_mut()?;
        let render = RedemptionFlowController::open(reward, swap_amount, offer_detail)?;
        let node = render.node_id();
        session.mounted.retain(|previous, mounted| match mounted {
            Mounted::Redemption(_) => {
                mounted.element_mut().detach_all();
                debug!(node = %previous, "superseded redemption flow unmounted");
                false
            }
            Mounted::OfferPreview(_) => true,
        });
        session.mounted.insert(node, Mounted::Redemption(render));
        Ok(node)
    }

    pub fn attach_redemption(
        &mut self,
        node: NodeId,
        callbacks: FlowCallbacks,
    ) -> Result<(), AgentError> {
        match self.session_mut()?.mounted_mut(node)? {
            Mounted::Redemption(render) => RedemptionFlowController::attach(render, callbacks),
            Mounted::OfferPreview(_) => Err(AgentError::invalid_input(format!(
                "{node} is an offer preview, not a redemption flow"
            ))),
        }
    }

    pub fn flow_state(&self, node: NodeId) -> Result<&FlowState, AgentError> {
        match self.session()?.mounted(node)? {
            Mounted::Redemption(render) => Ok(&render.state),
            Mounted::OfferPreview(_) => Err(AgentError::invalid_input(format!(
                "{node} is not a redemption flow"
            ))),
        }
    }

    pub fn mount_offer_preview(
        &mut self,
        on_view_offers: impl FnMut() + 'static,
    ) -> Result<NodeId, AgentError> {
        let session = self.session_mut()?;
        let element = OfferPreviewCard::create(&session.catalog.offers, on_view_offers)?;
        let node = element.id();
        session.mounted.insert(node, Mounted::OfferPreview(element));
        Ok(node)
    }

    pub fn markup(&self, node: NodeId) -> Result<&str, AgentError> {
        Ok(self.session()?.mounted(node)?.element().markup())
    }

    /// Forwards a user gesture on `control` of `node`. Returns whether a
    /// handler ran.
    pub fn click(&mut self, node: NodeId, control: Control) -> Result<bool, AgentError> {
        Ok(self.session_mut()?.mounted_mut(node)?.element_mut().click(control))
    }

    pub fn unmount(&mut self, node: NodeId) -> Result<(), AgentError> {
        let mut mounted = self
            .session_mut()?
            .mounted
            .remove(&node)
            .ok_or(AgentError::UnknownNode(node))?;
        mounted.element_mut().detach_all();
        debug!(%node, "node unmounted");
        Ok(())
    }

    pub fn render_brands(&self) -> Result<String, AgentError> {
        Ok(BrandListView::render(&self.session()?.catalog.brands))
    }

    pub fn render_categories(&self) -> Result<String, AgentError> {
        Ok(CategoryListView::render(&self.session()?.catalog.categories))
    }

    pub fn render_offers(&self) -> Result<String, AgentError> {
        let session = self.session()?;
        Ok(OfferListView::render(&session.catalog.offers, &session.links))
    }

    pub fn render_products(&self) -> Result<String, AgentError> {
        Ok(ProductListView::render(&self.session()?.catalog.products))
    }

    pub fn mounted_count(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |session| session.mounted.len())
    }

    pub fn listener_count(&self) -> usize {
        self.session.as_ref().map_or(0, |session| {
            session
                .mounted
                .values()
                .map(|mounted| mounted.element().listener_count())
                .sum()
        })
    }
}

impl Drop for MeAgent {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
#[path = "tests/agent_tests.rs"]
mod tests;
